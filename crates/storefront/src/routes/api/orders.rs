//! Order placement API handler.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::orders::OrderRepository;
use crate::error::AppError;
use crate::middleware::VisitorIdentity;
use crate::models::order::ShippingFields;
use crate::state::AppState;

/// Check out the identity's cart into an order.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    VisitorIdentity(identity): VisitorIdentity,
    Json(fields): Json<ShippingFields>,
) -> Result<Json<Value>, AppError> {
    validate_shipping(&fields)?;

    let orders = OrderRepository::new(state.pool());
    let order = orders.place(&identity, &fields).await?;

    tracing::info!(order_number = %order.order_number, "order placed");

    Ok(Json(json!({
        "success": true,
        "order_number": order.order_number,
    })))
}

/// Required shipping fields must be present before we touch the cart.
fn validate_shipping(fields: &ShippingFields) -> Result<(), AppError> {
    let required = [
        ("first_name", &fields.first_name),
        ("last_name", &fields.last_name),
        ("email", &fields.email),
        ("phone", &fields.phone),
        ("address", &fields.address),
        ("city", &fields.city),
        ("state", &fields.state),
        ("zip_code", &fields.zip_code),
    ];

    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{name} is required")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ShippingFields {
        serde_json::from_value(serde_json::json!({
            "first_name": "Priya",
            "last_name": "Nair",
            "email": "priya@example.com",
            "phone": "9876543210",
            "address": "12 MG Road",
            "city": "Kochi",
            "state": "Kerala",
            "zip_code": "682001",
        }))
        .expect("valid payload")
    }

    #[test]
    fn test_validate_shipping_accepts_complete_fields() {
        assert!(validate_shipping(&fields()).is_ok());

        let f = fields();
        assert_eq!(f.country, "India");
        assert_eq!(f.payment_method, "card");
    }

    #[test]
    fn test_validate_shipping_rejects_blank_required_field() {
        let mut f = fields();
        f.city = "   ".to_owned();
        let err = validate_shipping(&f).expect_err("blank city");
        assert!(err.to_string().contains("city"));
    }
}
