pub mod investor_form;
pub mod investor_table;
pub mod navbar;
pub mod state_lookup;
pub mod threshold_panel;
