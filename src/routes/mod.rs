pub mod announcements;

pub mod assignments;

pub mod attendance;

pub mod auth;

pub mod classes;

pub mod dashboard;

pub mod homerooms;

pub mod schedules;

pub mod subjects;

pub mod system;

pub mod users;

pub use announcements::configure_announcement_routes;
pub use assignments::configure_assignment_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use homerooms::configure_homeroom_routes;
pub use schedules::configure_schedule_routes;
pub use subjects::configure_subject_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
