//! Conversions between domain types and wire messages.

use common::wire::{OrderLineMessage, OrderMessage, UserMessage};
use common::{format_timestamp, parse_timestamp};
use orders::{Order, OrderLine, UserSnapshot};
use users::User;

pub fn user_to_message(user: &User) -> UserMessage {
    UserMessage {
        user_id: user.user_id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        created_at: format_timestamp(&user.created_at),
    }
}

/// Builds the order side's view of a user. An unreadable `created_at` becomes the epoch.
pub fn snapshot_from_message(message: UserMessage) -> UserSnapshot {
    UserSnapshot {
        created_at: parse_timestamp(&message.created_at),
        user_id: message.user_id,
        email: message.email,
        name: message.name,
    }
}

pub fn order_to_message(order: &Order) -> OrderMessage {
    OrderMessage {
        order_id: order.order_id.clone(),
        user_id: order.user_id.clone(),
        items: order
            .items
            .iter()
            .map(|line| OrderLineMessage {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            })
            .collect(),
        status: order.status.clone(),
        created_at: format_timestamp(&order.created_at),
    }
}

pub fn order_lines_from_messages(items: Vec<OrderLineMessage>) -> Vec<OrderLine> {
    items
        .into_iter()
        .map(|line| OrderLine::new(line.product_id, line.quantity))
        .collect()
}
