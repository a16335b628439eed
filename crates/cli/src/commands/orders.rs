//! Order history commands.

use backlink_vista_core::{OrderId, OrderPeriod, OrderQuery, OrderStatus};

use crate::client::ApiClient;
use crate::commands::account::require_session;
use crate::error::CliError;
use crate::output;

pub async fn list(
    client: &ApiClient,
    status: Option<OrderStatus>,
    period: Option<OrderPeriod>,
    search: Option<String>,
) -> Result<(), CliError> {
    require_session(client)?;

    let query = OrderQuery {
        status,
        period,
        search,
    };
    let orders = client.orders(&query).await?;
    output::emit(&output::orders(&orders));
    Ok(())
}

pub async fn show(client: &ApiClient, id: OrderId) -> Result<(), CliError> {
    require_session(client)?;

    let order = client.order(id).await?;
    output::emit(&output::order(&order));
    Ok(())
}

pub async fn cancel(client: &ApiClient, id: OrderId) -> Result<(), CliError> {
    require_session(client)?;

    let order = client.cancel_order(id).await?;
    output::emit(&format!("Order {} is {}", order.id, order.status));
    Ok(())
}

pub async fn set_status(
    client: &ApiClient,
    id: OrderId,
    status: OrderStatus,
) -> Result<(), CliError> {
    require_session(client)?;

    let order = client.set_order_status(id, status).await?;
    output::emit(&format!("Order {} is {}", order.id, order.status));
    Ok(())
}

pub async fn summary(client: &ApiClient) -> Result<(), CliError> {
    require_session(client)?;

    let summary = client.order_summary().await?;
    output::emit(&output::summary(&summary));
    Ok(())
}
