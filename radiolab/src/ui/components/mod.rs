pub mod chrome;
pub mod dialogs;
pub mod empty_state;
pub mod form;
pub mod help_popup;
pub mod notifications;
pub mod pagination_bar;
pub mod search_input;
