//! CRUD resource services over the paginated list endpoints.

pub mod clients;
pub mod shipments;

pub use clients::ClientsService;
pub use shipments::ShipmentsService;
