pub mod apply_fine_cmd;
pub mod pay_fine_cmd;
