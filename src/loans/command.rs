pub mod borrow_item_cmd;
pub mod return_item_cmd;
