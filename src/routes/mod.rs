/// Router Module Index
///
/// Routes are split by who may reach them. Access control is attached per module in
/// `create_router` through Axum layers, never left to individual handlers.

/// Anonymous site reads and the booking form.
pub mod public;

/// Routes that need any valid staff session.
pub mod authenticated;

/// The backoffice, nested under `/admin` and wrapped by the role-based route gate.
pub mod admin;
