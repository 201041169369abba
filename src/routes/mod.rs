// huginn-service/src/routes/mod.rs
pub mod grant_routes;
pub mod invitation_routes;
pub mod link_routes;
pub mod notification_routes;
