pub mod equipment_routes;
pub mod journey_routes;
