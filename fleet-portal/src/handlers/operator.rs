use super::{current_user_id, ApiResultExt, SignedOut};
use crate::api::ApiGateway;
use crate::forms::{RouteForm, ShipForm};
use crate::models::{Report, ReportStatus, Route, Ship, ShipType, User};
use askama::Template;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::collections::HashMap;

const SHIPS_PATH: &str = "/app/operator/ships";
const ROUTES_PATH: &str = "/app/operator/routes";
const REPORTS_PATH: &str = "/app/operator/reports";

fn count_label<T>(items: &Option<Vec<T>>) -> String {
    items
        .as_ref()
        .map(|items| items.len().to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Template)]
#[template(path = "operator/dashboard.html")]
pub struct DashboardTemplate {
    pub ships: String,
    pub routes: String,
    pub pending_reports: String,
    pub banner: Option<String>,
}

pub async fn dashboard(gateway: ApiGateway) -> Result<Response, SignedOut> {
    let mut banner = None;
    let api = gateway.operator();
    let (ships, routes, reports) = tokio::join!(api.ships(), api.routes(), api.reports());

    let ships = ships.or_banner(&mut banner, "Could not load ships")?;
    let routes = routes.or_banner(&mut banner, "Could not load routes")?;
    let pending = reports
        .or_banner(&mut banner, "Could not load reports")?
        .map(|reports| reports.into_iter().filter(Report::is_pending).collect::<Vec<_>>());

    Ok(DashboardTemplate {
        ships: count_label(&ships),
        routes: count_label(&routes),
        pending_reports: count_label(&pending),
        banner,
    }
    .into_response())
}

#[derive(Template)]
#[template(path = "operator/ships.html")]
pub struct ShipsTemplate {
    pub ships: Vec<Ship>,
    pub ship_types: &'static [ShipType],
    pub banner: Option<String>,
}

async fn render_ships(
    gateway: &ApiGateway,
    status: StatusCode,
    mut banner: Option<String>,
) -> Result<Response, SignedOut> {
    let ships = gateway
        .operator()
        .ships()
        .await
        .or_banner(&mut banner, "Could not load ships")?
        .unwrap_or_default();

    let template = ShipsTemplate {
        ships,
        ship_types: &ShipType::ALL,
        banner,
    };
    Ok((status, template).into_response())
}

pub async fn ships_page(gateway: ApiGateway) -> Result<Response, SignedOut> {
    render_ships(&gateway, StatusCode::OK, None).await
}

pub async fn create_ship(gateway: ApiGateway, Form(form): Form<ShipForm>) -> Result<Response, SignedOut> {
    let user_id = current_user_id(&gateway).await?;
    let ship = match form.into_payload(user_id) {
        Ok(ship) => ship,
        Err(e) => return render_ships(&gateway, StatusCode::UNPROCESSABLE_ENTITY, Some(e.to_string())).await,
    };

    let mut banner = None;
    if let Some(created) = gateway
        .operator()
        .create_ship(&ship)
        .await
        .or_banner(&mut banner, "Could not save the ship")?
    {
        tracing::info!(ship_id = created.id, "Ship registered");
        return Ok(Redirect::to(SHIPS_PATH).into_response());
    }
    render_ships(&gateway, StatusCode::OK, banner).await
}

pub async fn delete_ship(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .operator()
        .delete_ship(id)
        .await
        .or_banner(&mut banner, "Could not delete the ship")?
        .is_some()
    {
        return Ok(Redirect::to(SHIPS_PATH).into_response());
    }
    render_ships(&gateway, StatusCode::OK, banner).await
}

/// A route with its ship and captain resolved for display.
pub struct RouteRow {
    pub route: Route,
    pub ship_name: String,
    pub captain_name: String,
}

#[derive(Template)]
#[template(path = "operator/routes.html")]
pub struct RoutesTemplate {
    pub rows: Vec<RouteRow>,
    pub ships: Vec<Ship>,
    pub captains: Vec<User>,
    pub banner: Option<String>,
}

async fn render_routes(
    gateway: &ApiGateway,
    status: StatusCode,
    mut banner: Option<String>,
) -> Result<Response, SignedOut> {
    let api = gateway.operator();
    let (routes, ships, captains) = tokio::join!(api.routes(), api.ships(), api.captains());

    let routes = routes.or_banner(&mut banner, "Could not load routes")?.unwrap_or_default();
    let ships = ships.or_banner(&mut banner, "Could not load ships")?.unwrap_or_default();
    let captains = captains
        .or_banner(&mut banner, "Could not load captains")?
        .unwrap_or_default();

    let ship_names: HashMap<i64, &str> = ships.iter().map(|s| (s.id, s.name.as_str())).collect();
    let captain_names: HashMap<i64, &str> = captains.iter().map(|c| (c.id, c.display_name())).collect();
    let rows = routes
        .into_iter()
        .map(|route| RouteRow {
            ship_name: ship_names
                .get(&route.ship_id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("#{}", route.ship_id)),
            captain_name: captain_names
                .get(&route.captain_id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("#{}", route.captain_id)),
            route,
        })
        .collect();

    let template = RoutesTemplate {
        rows,
        ships,
        captains,
        banner,
    };
    Ok((status, template).into_response())
}

pub async fn routes_page(gateway: ApiGateway) -> Result<Response, SignedOut> {
    render_routes(&gateway, StatusCode::OK, None).await
}

pub async fn create_route(gateway: ApiGateway, Form(form): Form<RouteForm>) -> Result<Response, SignedOut> {
    let operator_id = current_user_id(&gateway).await?;
    let route = match form.into_payload(operator_id) {
        Ok(route) => route,
        Err(e) => return render_routes(&gateway, StatusCode::UNPROCESSABLE_ENTITY, Some(e.to_string())).await,
    };

    let mut banner = None;
    if let Some(created) = gateway
        .operator()
        .create_route(&route)
        .await
        .or_banner(&mut banner, "Could not save the route")?
    {
        tracing::info!(route_id = created.id, captain_id = created.captain_id, "Route planned");
        return Ok(Redirect::to(ROUTES_PATH).into_response());
    }
    render_routes(&gateway, StatusCode::OK, banner).await
}

pub async fn delete_route(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .operator()
        .delete_route(id)
        .await
        .or_banner(&mut banner, "Could not delete the route")?
        .is_some()
    {
        return Ok(Redirect::to(ROUTES_PATH).into_response());
    }
    render_routes(&gateway, StatusCode::OK, banner).await
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub status: Option<String>,
}

pub struct FilterTab {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "operator/reports.html")]
pub struct ReportsTemplate {
    pub reports: Vec<Report>,
    pub tabs: Vec<FilterTab>,
    pub banner: Option<String>,
}

async fn render_reports(
    gateway: &ApiGateway,
    filter: Option<&str>,
    mut banner: Option<String>,
) -> Result<Response, SignedOut> {
    let wanted = filter.and_then(ReportStatus::from_filter);
    let reports = gateway
        .operator()
        .reports()
        .await
        .or_banner(&mut banner, "Could not load reports")?
        .unwrap_or_default()
        .into_iter()
        .filter(|report| wanted.map_or(true, |status| report.status == status))
        .collect();

    let active_key = wanted.map(|_| filter.unwrap_or_default()).unwrap_or("all");
    let tabs = [("all", "All"), ("new", "New"), ("approved", "Approved"), ("rejected", "Rejected")]
        .into_iter()
        .map(|(key, label)| FilterTab {
            key,
            label,
            active: key == active_key,
        })
        .collect();

    Ok(ReportsTemplate {
        reports,
        tabs,
        banner,
    }
    .into_response())
}

pub async fn reports_page(
    gateway: ApiGateway,
    Query(filter): Query<ReportFilter>,
) -> Result<Response, SignedOut> {
    render_reports(&gateway, filter.status.as_deref(), None).await
}

pub async fn approve_report(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .operator()
        .approve_report(id)
        .await
        .or_banner(&mut banner, "Could not approve the report")?
        .is_some()
    {
        tracing::info!(report_id = id, "Report approved");
        return Ok(Redirect::to(REPORTS_PATH).into_response());
    }
    render_reports(&gateway, None, banner).await
}

pub async fn reject_report(gateway: ApiGateway, Path(id): Path<i64>) -> Result<Response, SignedOut> {
    let mut banner = None;
    if gateway
        .operator()
        .reject_report(id)
        .await
        .or_banner(&mut banner, "Could not reject the report")?
        .is_some()
    {
        tracing::info!(report_id = id, "Report rejected");
        return Ok(Redirect::to(REPORTS_PATH).into_response());
    }
    render_reports(&gateway, None, banner).await
}
