//! Order history and the manager order workflow.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use arcadia_core::{OrderId, OrderStatus};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireManager, RequireUser};
use crate::models::order::{Order, OrderItem};
use crate::pagination::{parse_page, PageInfo, Paginated};
use crate::response::json_ok;
use crate::state::AppState;

const MANAGE_ORDERS_PER_PAGE: u32 = 20;

#[derive(Debug, Serialize)]
struct OrderSummary {
    id: i32,
    status: &'static str,
    total_price: Decimal,
    created_at: DateTime<Utc>,
}

impl OrderSummary {
    fn new(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            status: order.status.as_str(),
            total_price: order.total_price,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct OrderLineView {
    title: String,
    slug: String,
    quantity: i32,
    price_snapshot: Decimal,
}

impl From<OrderItem> for OrderLineView {
    fn from(item: OrderItem) -> Self {
        Self {
            title: item.title,
            slug: item.slug,
            quantity: item.quantity,
            price_snapshot: item.price_snapshot,
        }
    }
}

#[derive(Debug, Serialize)]
struct OrderDetail {
    #[serde(flatten)]
    summary: OrderSummary,
    items: Vec<OrderLineView>,
    payment_status: Option<&'static str>,
}

/// GET /api/orders - the caller's order history, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.id())
        .await?;
    let items: Vec<OrderSummary> = orders.iter().map(OrderSummary::new).collect();
    Ok(json_ok(items))
}

/// GET /api/orders/{id} - one of the caller's orders with its lines.
///
/// Another user's order id answers 404, not 403, so ids cannot be
/// probed.
pub async fn detail(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<i32>,
) -> Result<Response> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .filter(|o| o.user_id == current.id())
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    let items = repo
        .items(order.id)
        .await?
        .into_iter()
        .map(OrderLineView::from)
        .collect();
    let payment_status = repo.payment(order.id).await?.map(|p| p.status.as_str());

    Ok(json_ok(OrderDetail {
        summary: OrderSummary::new(&order),
        items,
        payment_status,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ManageQuery {
    pub status: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
struct ManagedOrderView {
    #[serde(flatten)]
    summary: OrderSummary,
    username: String,
    /// Statuses a manager may move this order to next.
    allowed_next: Vec<&'static str>,
}

/// GET /api/manage/orders - every order, optionally filtered by status.
pub async fn manage_list(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
    Query(query): Query<ManageQuery>,
) -> Result<Response> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(|_| AppError::BadRequest(format!("Unknown status '{raw}'.")))?,
        ),
    };

    let repo = OrderRepository::new(state.pool());
    let total = repo.count_managed(status).await?;
    let info = PageInfo::resolve(
        parse_page(query.page.as_deref()),
        total,
        MANAGE_ORDERS_PER_PAGE,
    );
    let rows = repo
        .list_managed(
            status,
            i64::from(MANAGE_ORDERS_PER_PAGE),
            info.offset(MANAGE_ORDERS_PER_PAGE),
        )
        .await?;

    let items: Vec<ManagedOrderView> = rows
        .into_iter()
        .map(|row| ManagedOrderView {
            summary: OrderSummary::new(&row.order),
            username: row.username,
            allowed_next: row
                .order
                .status
                .allowed_next()
                .iter()
                .map(|s| s.as_str())
                .collect(),
        })
        .collect();

    Ok(json_ok(Paginated {
        items,
        pagination: info,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

/// POST /api/manage/orders/{id}/status - advance an order through its
/// lifecycle.
///
/// The transition is validated against the state machine before the
/// write; the write itself re-checks the stored status so racing
/// managers cannot both succeed.
pub async fn manage_status(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
    Path(id): Path<i32>,
    Json(payload): Json<StatusPayload>,
) -> Result<Response> {
    let next = payload
        .status
        .parse::<OrderStatus>()
        .map_err(|_| AppError::BadRequest(format!("Unknown status '{}'.", payload.status)))?;

    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    let next = order.status.transition(next).map_err(AppError::Core)?;
    let updated = repo.update_status(order.id, order.status, next).await?;

    Ok(json_ok(OrderSummary::new(&updated)))
}
