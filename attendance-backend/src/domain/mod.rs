// attendance-backend/src/domain/mod.rs

pub mod access_scope;
pub mod attendance_model;
pub mod attendance_status;
pub mod district_model;
pub mod group_model;
pub mod hierarchy;
pub mod old_group_model;
pub mod region_model;
pub mod role_model;
pub mod state_model;
pub mod user_model;
pub mod user_role_model;
