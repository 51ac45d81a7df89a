pub mod can_borrow_cmd;
pub mod update_rules_cmd;
