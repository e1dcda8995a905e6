use super::{ApiError, ApiGateway, ApiRequest};
use crate::models::{FishingSpot, FishingSpotTime, NewFishingSpot, NewReport, Report, Route};

/// Vessel-level calls available to captains.
pub struct CaptainApi<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> CaptainApi<'a> {
    pub(super) fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn routes(&self) -> Result<Vec<Route>, ApiError> {
        self.gateway.send(ApiRequest::get("/captain/routes/")).await
    }

    pub async fn start_route(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.gateway
            .send(ApiRequest::post("/captain/routes/{id}/start").id(id))
            .await
    }

    pub async fn complete_route(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.gateway
            .send(ApiRequest::post("/captain/routes/{id}/complete").id(id))
            .await
    }

    pub async fn fishing_spots(&self) -> Result<Vec<FishingSpot>, ApiError> {
        self.gateway
            .send(ApiRequest::get("/captain/fishing_spots/"))
            .await
    }

    pub async fn create_fishing_spot(&self, spot: &NewFishingSpot) -> Result<FishingSpot, ApiError> {
        self.gateway
            .send(ApiRequest::post("/captain/fishing_spots/").json(spot)?)
            .await
    }

    pub async fn update_fishing_spot(
        &self,
        id: i64,
        spot: &NewFishingSpot,
    ) -> Result<FishingSpot, ApiError> {
        self.gateway
            .send(ApiRequest::put("/captain/fishing_spots/{id}").id(id).json(spot)?)
            .await
    }

    pub async fn delete_fishing_spot(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.gateway
            .send(ApiRequest::delete("/captain/fishing_spots/{id}").id(id))
            .await
    }

    /// The API reads both timestamps from the query string; an absent one is left unchanged.
    pub async fn update_fishing_spot_time(
        &self,
        id: i64,
        time: &FishingSpotTime,
    ) -> Result<FishingSpot, ApiError> {
        self.gateway
            .send(ApiRequest::put("/captain/fishing_spots/{id}/time/").id(id).query(time)?)
            .await
    }

    pub async fn reports(&self) -> Result<Vec<Report>, ApiError> {
        self.gateway.send(ApiRequest::get("/reports")).await
    }

    pub async fn create_report(&self, report: &NewReport) -> Result<Report, ApiError> {
        self.gateway
            .send(ApiRequest::post("/reports").json(report)?)
            .await
    }

    pub async fn update_report(&self, id: i64, report: &NewReport) -> Result<Report, ApiError> {
        self.gateway
            .send(ApiRequest::put("/captain/reports/{id}").id(id).json(report)?)
            .await
    }

    pub async fn delete_report(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.gateway
            .send(ApiRequest::delete("/captain/reports/{id}").id(id))
            .await
    }

    pub async fn cancel_report(&self, id: i64) -> Result<Report, ApiError> {
        self.gateway
            .send(ApiRequest::post("/captain/reports/{id}/cancel").id(id))
            .await
    }
}
