use super::{ApiResultExt, SignedOut};
use crate::api::ApiGateway;
use crate::forms::{FishingSpotForm, ReportForm, SpotTimeForm};
use crate::models::{FishType, FishingSpot, Report, Route};
use askama::Template;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};

const ROUTES_PATH: &str = "/app/captain/routes";
const SPOTS_PATH: &str = "/app/captain/spots";
const REPORTS_PATH: &str = "/app/captain/reports";

#[derive(Template)]
#[template(path = "captain/dashboard.html")]
pub struct DashboardTemplate {
    pub active_route: Option<Route>,
    pub spots: String,
    pub reports: String,
    pub banner: Option<String>,
}

pub async fn dashboard(gateway: ApiGateway) -> Result<Response, SignedOut> {
    let mut banner = None;
    let api = gateway.captain();
    let (routes, spots, reports) = tokio::join!(api.routes(), api.fishing_spots(), api.reports());

    let active_route = routes
        .or_banner(&mut banner, "Could not load routes")?
        .and_then(|routes| routes.into_iter().find(Route::is_active));
    let spots = spots.or_banner(&mut banner, "Could not load fishing spots")?;
    let reports = reports.or_banner(&mut banner, "Could not load reports")?;

    Ok(DashboardTemplate {
        active_route,
        spots: spots.map_or_else(|| "-".to_string(), |s| s.len().to_string()),
        reports: reports.map_or_else(|| "-".to_string(), |r| r.len().to_string()),
        banner,
    }
    .into_response())
}

#[derive(Template)]
#[template(path = "captain/routes.html")]
pub struct RoutesTemplate {
    pub routes: Vec<Route>,
    pub banner: Option<String>,
}

async fn render_routes(gateway: &ApiGateway, mut banner: Option<String>) -> Result<Response, SignedOut> {
    let routes = gateway
        .captain()
        .routes()
        .await
        .or_banner(&mut banner, "Could not load routes")?
        .unwrap_or_default();
    Ok(RoutesTemplate { routes, banner }.into_response())
}

pub async fn routes_page(gateway: ApiGateway) -> Result<Response, SignedOut> {
    render_routes(&gateway, None).await
}

pub async fn start_route(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .captain()
        .start_route(id)
        .await
        .or_banner(&mut banner, "Could not start the route")?
        .is_some()
    {
        tracing::info!(route_id = id, "Route started");
        return Ok(Redirect::to(ROUTES_PATH).into_response());
    }
    render_routes(&gateway, banner).await
}

pub async fn complete_route(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .captain()
        .complete_route(id)
        .await
        .or_banner(&mut banner, "Could not complete the route")?
        .is_some()
    {
        tracing::info!(route_id = id, "Route completed");
        return Ok(Redirect::to(ROUTES_PATH).into_response());
    }
    render_routes(&gateway, banner).await
}

#[derive(Template)]
#[template(path = "captain/spots.html")]
pub struct SpotsTemplate {
    pub spots: Vec<FishingSpot>,
    pub fish_types: &'static [FishType],
    pub banner: Option<String>,
}

async fn render_spots(
    gateway: &ApiGateway,
    status: StatusCode,
    mut banner: Option<String>,
) -> Result<Response, SignedOut> {
    let spots = gateway
        .captain()
        .fishing_spots()
        .await
        .or_banner(&mut banner, "Could not load fishing spots")?
        .unwrap_or_default();

    let template = SpotsTemplate {
        spots,
        fish_types: &FishType::ALL,
        banner,
    };
    Ok((status, template).into_response())
}

pub async fn spots_page(gateway: ApiGateway) -> Result<Response, SignedOut> {
    render_spots(&gateway, StatusCode::OK, None).await
}

pub async fn create_spot(
    gateway: ApiGateway,
    Form(form): Form<FishingSpotForm>,
) -> Result<Response, SignedOut> {
    let spot = match form.into_payload() {
        Ok(spot) => spot,
        Err(e) => return render_spots(&gateway, StatusCode::UNPROCESSABLE_ENTITY, Some(e.to_string())).await,
    };

    let mut banner = None;
    if let Some(created) = gateway
        .captain()
        .create_fishing_spot(&spot)
        .await
        .or_banner(&mut banner, "Could not save the fishing spot")?
    {
        tracing::info!(spot_id = created.id, "Fishing spot recorded");
        return Ok(Redirect::to(SPOTS_PATH).into_response());
    }
    render_spots(&gateway, StatusCode::OK, banner).await
}

pub async fn update_spot_time(
    gateway: ApiGateway,
    Path(id): Path<i64>,
    Form(form): Form<SpotTimeForm>,
) -> Result<Response, SignedOut> {
    let times = match form.into_payload() {
        Ok(times) => times,
        Err(e) => return render_spots(&gateway, StatusCode::UNPROCESSABLE_ENTITY, Some(e.to_string())).await,
    };

    let mut banner = None;
    if gateway
        .captain()
        .update_fishing_spot_time(id, &times)
        .await
        .or_banner(&mut banner, "Could not update the fishing spot")?
        .is_some()
    {
        return Ok(Redirect::to(SPOTS_PATH).into_response());
    }
    render_spots(&gateway, StatusCode::OK, banner).await
}

pub async fn delete_spot(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .captain()
        .delete_fishing_spot(id)
        .await
        .or_banner(&mut banner, "Could not delete the fishing spot")?
        .is_some()
    {
        return Ok(Redirect::to(SPOTS_PATH).into_response());
    }
    render_spots(&gateway, StatusCode::OK, banner).await
}

#[derive(Template)]
#[template(path = "captain/reports.html")]
pub struct ReportsTemplate {
    pub reports: Vec<Report>,
    pub routes: Vec<Route>,
    pub fish_types: &'static [FishType],
    pub banner: Option<String>,
}

async fn render_reports(
    gateway: &ApiGateway,
    status: StatusCode,
    mut banner: Option<String>,
) -> Result<Response, SignedOut> {
    let api = gateway.captain();
    let (reports, routes) = tokio::join!(api.reports(), api.routes());

    let reports = reports.or_banner(&mut banner, "Could not load reports")?.unwrap_or_default();
    let routes = routes.or_banner(&mut banner, "Could not load routes")?.unwrap_or_default();

    let template = ReportsTemplate {
        reports,
        routes,
        fish_types: &FishType::ALL,
        banner,
    };
    Ok((status, template).into_response())
}

pub async fn reports_page(gateway: ApiGateway) -> Result<Response, SignedOut> {
    render_reports(&gateway, StatusCode::OK, None).await
}

pub async fn create_report(gateway: ApiGateway, Form(form): Form<ReportForm>) -> Result<Response, SignedOut> {
    let report = match form.into_payload() {
        Ok(report) => report,
        Err(e) => return render_reports(&gateway, StatusCode::UNPROCESSABLE_ENTITY, Some(e.to_string())).await,
    };

    let mut banner = None;
    if let Some(created) = gateway
        .captain()
        .create_report(&report)
        .await
        .or_banner(&mut banner, "Could not submit the report")?
    {
        tracing::info!(report_id = created.id, "Catch report submitted");
        return Ok(Redirect::to(REPORTS_PATH).into_response());
    }
    render_reports(&gateway, StatusCode::OK, banner).await
}

pub async fn cancel_report(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .captain()
        .cancel_report(id)
        .await
        .or_banner(&mut banner, "Could not cancel the report")?
        .is_some()
    {
        return Ok(Redirect::to(REPORTS_PATH).into_response());
    }
    render_reports(&gateway, StatusCode::OK, banner).await
}

pub async fn delete_report(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .captain()
        .delete_report(id)
        .await
        .or_banner(&mut banner, "Could not delete the report")?
        .is_some()
    {
        return Ok(Redirect::to(REPORTS_PATH).into_response());
    }
    render_reports(&gateway, StatusCode::OK, banner).await
}
