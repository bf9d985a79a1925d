pub mod api_utils;
pub mod components;
pub mod crm_api;
pub mod icons;
pub mod state;
