// src/entity/order.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ensure_finite, RecordBase};
use crate::error::{Result, VbmsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    #[default]
    Phone,
    Online,
    WalkIn,
    AiAssistant,
}

impl std::fmt::Display for OrderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSource::Phone => write!(f, "phone"),
            OrderSource::Online => write!(f, "online"),
            OrderSource::WalkIn => write!(f, "walk_in"),
            OrderSource::AiAssistant => write!(f, "ai_assistant"),
        }
    }
}

impl std::str::FromStr for OrderSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "phone" => Ok(OrderSource::Phone),
            "online" => Ok(OrderSource::Online),
            "walk_in" | "walkin" => Ok(OrderSource::WalkIn),
            "ai_assistant" | "ai" => Ok(OrderSource::AiAssistant),
            _ => Err(format!("Invalid order source: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Pickup,
    Delivery,
    DineIn,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Pickup => write!(f, "pickup"),
            OrderType::Delivery => write!(f, "delivery"),
            OrderType::DineIn => write!(f, "dine_in"),
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pickup" => Ok(OrderType::Pickup),
            "delivery" => Ok(OrderType::Delivery),
            "dine_in" | "dinein" => Ok(OrderType::DineIn),
            _ => Err(format!("Invalid order type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// The forward path is `pending → confirmed → preparing → ready`, then
    /// either `ready → completed` or `ready → out_for_delivery → delivered
    /// → completed`. Any state except `cancelled` itself may be cancelled.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Cancelled, _) => false,
            (_, Cancelled) => true,
            (Pending, Confirmed)
            | (Confirmed, Preparing)
            | (Preparing, Ready)
            | (Ready, OutForDelivery)
            | (Ready, Completed)
            | (OutForDelivery, Delivered)
            | (Delivered, Completed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Preparing => write!(f, "preparing"),
            OrderStatus::Ready => write!(f, "ready"),
            OrderStatus::OutForDelivery => write!(f, "out_for_delivery"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    /// quantity × (unit price + modifier prices)
    pub total: f64,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl OrderItem {
    pub fn new(name: String, quantity: u32, unit_price: f64) -> Result<Self> {
        Self::with_modifiers(name, quantity, unit_price, Vec::new())
    }

    pub fn with_modifiers(
        name: String,
        quantity: u32,
        unit_price: f64,
        modifiers: Vec<Modifier>,
    ) -> Result<Self> {
        if quantity == 0 {
            return Err(VbmsError::InvalidValue(format!(
                "item '{}' must have a quantity of at least 1",
                name
            )));
        }

        ensure_finite("unit price", unit_price)?;
        for modifier in &modifiers {
            ensure_finite("modifier price", modifier.price)?;
        }

        let per_unit = unit_price + modifiers.iter().map(|m| m.price).sum::<f64>();
        Ok(Self {
            name,
            quantity,
            unit_price,
            total: per_unit * quantity as f64,
            modifiers,
        })
    }
}

/// Order amounts as supplied by the caller; none of them are derived here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Pricing {
    pub subtotal: f64,
    pub tax: f64,
    pub tip: f64,
    pub fees: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    /// `VBMS-<year>-<seq>`, assigned once on first persist
    pub order_id: Option<String>,
    pub source: OrderSource,
    #[serde(rename = "type")]
    pub order_type: OrderType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(flatten)]
    pub base: RecordBase,
    pub order_info: OrderInfo,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub pricing: Pricing,
    pub status: OrderStatus,
    pub status_history: Vec<StatusChange>,
}

impl Order {
    pub fn new(source: OrderSource, order_type: OrderType, now: DateTime<Utc>) -> Self {
        Self {
            base: RecordBase::at(now),
            order_info: OrderInfo {
                order_id: None,
                source,
                order_type,
            },
            items: Vec::new(),
            pricing: Pricing::default(),
            status: OrderStatus::Pending,
            status_history: vec![StatusChange {
                status: OrderStatus::Pending,
                at: now,
                note: None,
            }],
        }
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_info.order_id.as_deref()
    }

    /// Reject item or pricing amounts that cannot be stored.
    pub fn check_amounts(&self) -> Result<()> {
        for item in &self.items {
            ensure_finite("unit price", item.unit_price)?;
            ensure_finite("item total", item.total)?;
            for modifier in &item.modifiers {
                ensure_finite("modifier price", modifier.price)?;
            }
        }

        let p = &self.pricing;
        for (field, value) in [
            ("subtotal", p.subtotal),
            ("tax", p.tax),
            ("tip", p.tip),
            ("fees", p.fees),
            ("discount", p.discount),
            ("total", p.total),
        ] {
            ensure_finite(field, value)?;
        }
        Ok(())
    }

    /// Move to `next`, appending the change to the history.
    pub fn transition(
        &mut self,
        next: OrderStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(VbmsError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        self.status = next;
        self.status_history.push(StatusChange {
            status: next,
            at: now,
            note,
        });
        self.base.touch(now);
        Ok(())
    }
}
