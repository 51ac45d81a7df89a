pub mod register_patron_cmd;
pub mod unregister_patron_cmd;
