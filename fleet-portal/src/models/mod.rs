pub mod fishing_spot;
pub mod report;
pub mod route;
pub mod ship;
pub mod timestamp;
pub mod user;

pub use fishing_spot::{FishType, FishingSpot, FishingSpotTime, NewFishingSpot};
pub use report::{NewReport, Report, ReportStatus};
pub use route::{NewRoute, Route, RouteStatus};
pub use ship::{NewShip, Ship, ShipType};
pub use user::{RegisterRequest, TokenResponse, User};
