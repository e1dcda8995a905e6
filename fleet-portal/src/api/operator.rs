use super::{ApiError, ApiGateway, ApiRequest};
use crate::models::{NewRoute, NewShip, Report, Route, Ship, User};

/// Fleet management calls available to operators.
pub struct OperatorApi<'a> {
    gateway: &'a ApiGateway,
}

impl<'a> OperatorApi<'a> {
    pub(super) fn new(gateway: &'a ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn ships(&self) -> Result<Vec<Ship>, ApiError> {
        self.gateway.send(ApiRequest::get("/operator/ships/")).await
    }

    pub async fn create_ship(&self, ship: &NewShip) -> Result<Ship, ApiError> {
        self.gateway
            .send(ApiRequest::post("/operator/ships/").json(ship)?)
            .await
    }

    pub async fn update_ship(&self, id: i64, ship: &NewShip) -> Result<Ship, ApiError> {
        self.gateway
            .send(ApiRequest::put("/operator/ships/{id}").id(id).json(ship)?)
            .await
    }

    pub async fn delete_ship(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.gateway
            .send(ApiRequest::delete("/operator/ships/{id}").id(id))
            .await
    }

    pub async fn routes(&self) -> Result<Vec<Route>, ApiError> {
        self.gateway.send(ApiRequest::get("/operator/routes/")).await
    }

    pub async fn create_route(&self, route: &NewRoute) -> Result<Route, ApiError> {
        self.gateway
            .send(ApiRequest::post("/operator/routes/").json(route)?)
            .await
    }

    pub async fn update_route(&self, id: i64, route: &NewRoute) -> Result<Route, ApiError> {
        self.gateway
            .send(ApiRequest::put("/operator/routes/{id}").id(id).json(route)?)
            .await
    }

    pub async fn delete_route(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.gateway
            .send(ApiRequest::delete("/operator/routes/{id}").id(id))
            .await
    }

    pub async fn captains(&self) -> Result<Vec<User>, ApiError> {
        self.gateway.send(ApiRequest::get("/operator/captains/")).await
    }

    pub async fn reports(&self) -> Result<Vec<Report>, ApiError> {
        self.gateway.send(ApiRequest::get("/reports")).await
    }

    /// Answers `{"status": "success"}`, not the updated report.
    pub async fn approve_report(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.gateway
            .send(ApiRequest::post("/reports/{id}/approve").id(id))
            .await
    }

    pub async fn reject_report(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.gateway
            .send(ApiRequest::post("/reports/{id}/reject").id(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{ApiGateway, FleetApi};
    use crate::config::FleetApiSettings;
    use crate::models::{NewRoute, NewShip, ShipType};
    use crate::session::{MemoryStorage, SessionStore};
    use chrono::{NaiveDate, TimeZone, Utc};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway(server: &MockServer) -> ApiGateway {
        let api = FleetApi::new(&FleetApiSettings {
            base_url: server.uri(),
            request_timeout_secs: None,
            user_agent: "fleet-portal-test".to_string(),
        })
        .unwrap();
        let storage =
            MemoryStorage::with_entries([("token", "T1"), ("userRole", "operator"), ("userId", "2")]);
        api.with_session(SessionStore::initialize(storage).await)
    }

    fn ship_json(id: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "Kite",
            "type": "траулер",
            "displacement": 300.0,
            "build_date": "2010-01-02",
            "user_id": 2
        })
    }

    #[tokio::test]
    async fn updates_ship_with_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/operator/ships/5"))
            .and(body_json(serde_json::json!({
                "name": "Kite",
                "type": "траулер",
                "displacement": 300.0,
                "build_date": "2010-01-02",
                "user_id": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ship_json(5)))
            .expect(1)
            .mount(&server)
            .await;

        let ship = gateway(&server)
            .await
            .operator()
            .update_ship(
                5,
                &NewShip {
                    name: "Kite".into(),
                    ship_type: ShipType::Trawler,
                    displacement: 300.0,
                    build_date: NaiveDate::from_ymd_opt(2010, 1, 2).unwrap(),
                    user_id: 2,
                },
            )
            .await
            .unwrap();

        assert_eq!(ship.id, 5);
    }

    #[tokio::test]
    async fn rejects_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reports/11/reject"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let body = gateway(&server).await.operator().reject_report(11).await.unwrap();
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn approves_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reports/3/approve"))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let body = gateway(&server).await.operator().approve_report(3).await.unwrap();
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn updates_route_with_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/operator/routes/4"))
            .and(body_json(serde_json::json!({
                "ship_id": 1,
                "operator_id": 2,
                "captain_id": 7,
                "code": "R-104",
                "departure_time": "2024-05-01T06:00:00Z",
                "return_time": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 4,
                "ship_id": 1,
                "operator_id": 2,
                "captain_id": 7,
                "code": "R-104",
                "departure_time": "2024-05-01T06:00:00",
                "return_time": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let route = gateway(&server)
            .await
            .operator()
            .update_route(
                4,
                &NewRoute {
                    ship_id: 1,
                    operator_id: 2,
                    captain_id: 7,
                    code: Some("R-104".into()),
                    departure_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap()),
                    return_time: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(route.id, 4);
        assert_eq!(route.code_label(), "R-104");
    }

    #[tokio::test]
    async fn lists_captains() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/operator/captains/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 7, "email": "cap@fleet.io", "role": "captain", "full_name": "Ivan"}
            ])))
            .mount(&server)
            .await;

        let captains = gateway(&server).await.operator().captains().await.unwrap();
        assert_eq!(captains.len(), 1);
        assert_eq!(captains[0].display_name(), "Ivan");
    }
}
