pub mod chat_pane;
pub mod input_bar;
pub mod login;
