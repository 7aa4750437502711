//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod daily_mission;
pub mod form;
pub mod mission_progress;
pub mod user;

// Re-export specific types to avoid conflicts
pub use daily_mission::{
    Column as DailyMissionColumn, Entity as DailyMission, Model as DailyMissionModel,
};
pub use form::{Column as FormColumn, Entity as Form, Model as FormModel};
pub use mission_progress::{
    Column as MissionProgressColumn, Entity as MissionProgress, Model as MissionProgressModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
