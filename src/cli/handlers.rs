use std::env;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::entity::{
    Call, CallCustomer, FileRecord, Inventory, Modifier, Order, OrderItem, OrderSource,
    OrderStatus, OrderType, Owner, Pricing,
};
use crate::error::{Result, VbmsError};
use crate::repository::Repository;
use crate::storage::{DocumentKind, SqliteStore};
use crate::warnings::{check_inventory, format_warning};
use crate::workspace;

fn open_repository() -> Result<Repository<SqliteStore>> {
    workspace::open(&workspace::find_root())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_enum<T: std::str::FromStr<Err = String>>(s: &str) -> Result<T> {
    s.parse().map_err(VbmsError::InvalidValue)
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;
    workspace::init(&root)?;

    println!("Initialized vbms workspace in {}", root.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_order_add(
    source: String,
    order_type: String,
    items: Vec<String>,
    subtotal: f64,
    tax: f64,
    tip: f64,
    fees: f64,
    discount: f64,
    total: f64,
    json: bool,
) -> Result<()> {
    let repo = open_repository()?;
    let now = Local::now();

    let source: OrderSource = parse_enum(&source)?;
    let order_type: OrderType = parse_enum(&order_type)?;

    let mut order = Order::new(source, order_type, now.with_timezone(&Utc));
    for item in &items {
        order.items.push(parse_item(item)?);
    }
    order.pricing = Pricing {
        subtotal,
        tax,
        tip,
        fees,
        discount,
        total,
    };

    let order = repo.create_order(order, &now)?;

    if json {
        print_json(&order)?;
    } else {
        println!(
            "Created order {} ({}) - {} item(s), total {:.2}",
            order.order_id().unwrap_or("-"),
            order.base.short_id(),
            order.items.len(),
            order.pricing.total
        );
    }

    Ok(())
}

pub fn handle_order_status(
    key: String,
    status: String,
    note: Option<String>,
    json: bool,
) -> Result<()> {
    let repo = open_repository()?;
    let next: OrderStatus = parse_enum(&status)?;

    let order = repo.update_order_status(&key, next, note, Utc::now())?;

    if json {
        print_json(&order)?;
    } else {
        println!(
            "Order {} is now {}",
            order.order_id().unwrap_or("-"),
            order.status
        );
    }

    Ok(())
}

pub fn handle_call_add(
    name: Option<String>,
    phone: Option<String>,
    details: Vec<String>,
    json: bool,
) -> Result<()> {
    let repo = open_repository()?;
    let now = Local::now();

    let mut call = Call::new(now.with_timezone(&Utc));
    if name.is_some() || phone.is_some() {
        call.customer = Some(CallCustomer { name, phone });
    }
    for detail in &details {
        let (key, value) = parse_key_value(detail)?;
        call.details
            .insert(key.to_string(), serde_json::Value::String(value.to_string()));
    }

    let call = repo.create_call(call, &now)?;

    if json {
        print_json(&call)?;
    } else {
        println!(
            "Logged call {} ({})",
            call.call_id().unwrap_or("-"),
            call.base.short_id()
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_inventory_add(
    name: String,
    sku: String,
    current: i64,
    reserved: i64,
    minimum: Option<i64>,
    maximum: Option<i64>,
    cost: f64,
    price: f64,
    expires: Option<String>,
    json: bool,
) -> Result<()> {
    let repo = open_repository()?;
    let now = Utc::now();
    let defaults = &repo.config().inventory_defaults;

    let mut item = Inventory::new(name, sku, now);
    item.stock.current = current;
    item.stock.reserved = reserved;
    item.stock.minimum = minimum.unwrap_or(defaults.minimum);
    item.stock.maximum = maximum.unwrap_or(defaults.maximum);
    item.pricing.cost = cost;
    item.pricing.price = price;
    item.expiration_date = expires.as_deref().map(parse_date).transpose()?;

    let item = repo.create_inventory(item, now)?;

    if json {
        print_json(&item)?;
    } else {
        println!(
            "Created inventory {} ({}) - {}",
            item.sku,
            item.base.short_id(),
            item.name
        );
        print_inventory_summary(&item);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_inventory_update(
    key: String,
    current: Option<i64>,
    reserved: Option<i64>,
    minimum: Option<i64>,
    maximum: Option<i64>,
    cost: Option<f64>,
    price: Option<f64>,
    expires: Option<String>,
    clear_expiration: bool,
    json: bool,
) -> Result<()> {
    let repo = open_repository()?;
    let mut item: Inventory = repo.resolve(&key)?;

    if let Some(current) = current {
        item.stock.current = current;
    }
    if let Some(reserved) = reserved {
        item.stock.reserved = reserved;
    }
    if let Some(minimum) = minimum {
        item.stock.minimum = minimum;
    }
    if let Some(maximum) = maximum {
        item.stock.maximum = maximum;
    }
    if let Some(cost) = cost {
        item.pricing.cost = cost;
    }
    if let Some(price) = price {
        item.pricing.price = price;
    }
    if clear_expiration {
        item.expiration_date = None;
        item.alerts.expiring_soon = false;
    } else if let Some(expires) = expires {
        item.expiration_date = Some(parse_date(&expires)?);
    }

    let item = repo.update_inventory(item, Utc::now())?;

    if json {
        print_json(&item)?;
    } else {
        println!(
            "Updated inventory {} ({}) - {}",
            item.sku,
            item.base.short_id(),
            item.name
        );
        print_inventory_summary(&item);
    }

    Ok(())
}

pub fn handle_inventory_alerts(json: bool) -> Result<()> {
    let repo = open_repository()?;
    let items: Vec<Inventory> = repo.list()?;
    let warnings = check_inventory(&items);

    if json {
        let messages: Vec<String> = warnings.iter().map(format_warning).collect();
        print_json(&messages)?;
    } else if warnings.is_empty() {
        println!("No stock warnings.");
    } else {
        for warning in &warnings {
            println!("{}", format_warning(warning));
        }
    }

    Ok(())
}

pub fn handle_file_add(
    storage_key: String,
    owner: String,
    role: String,
    size: u64,
    category: String,
    json: bool,
) -> Result<()> {
    let repo = open_repository()?;

    let owner = Owner {
        user_id: owner,
        role: parse_enum(&role)?,
    };
    let file = FileRecord::new(
        owner,
        storage_key,
        size,
        parse_enum(&category)?,
        Utc::now(),
    );
    let file = repo.create_file(file)?;

    if json {
        print_json(&file)?;
    } else {
        println!(
            "Registered file {} ({}) [{}] {} bytes",
            file.storage_key,
            file.base.short_id(),
            file.category,
            file.size
        );
    }

    Ok(())
}

pub fn handle_file_access(key: String, json: bool) -> Result<()> {
    let repo = open_repository()?;
    let file = repo.record_file_access(&key, Utc::now())?;

    if json {
        print_json(&file)?;
    } else {
        println!(
            "File {} downloaded {} time(s)",
            file.storage_key, file.download_count
        );
    }

    Ok(())
}

pub fn handle_list(kind: String, json: bool) -> Result<()> {
    let repo = open_repository()?;

    match parse_enum::<DocumentKind>(&kind)? {
        DocumentKind::Order => {
            let orders: Vec<Order> = repo.list()?;
            if json {
                print_json(&orders)?;
            } else if orders.is_empty() {
                println!("No orders found.");
            } else {
                println!("Orders:\n");
                for o in orders {
                    println!(
                        "  {} ({}) [{}|{}|{}] total {:.2}",
                        o.order_id().unwrap_or("-"),
                        o.base.short_id(),
                        o.status,
                        o.order_info.source,
                        o.order_info.order_type,
                        o.pricing.total
                    );
                }
            }
        }
        DocumentKind::Call => {
            let calls: Vec<Call> = repo.list()?;
            if json {
                print_json(&calls)?;
            } else if calls.is_empty() {
                println!("No calls found.");
            } else {
                println!("Calls:\n");
                for c in calls {
                    let caller = c
                        .customer
                        .as_ref()
                        .and_then(|cu| cu.name.as_deref().or(cu.phone.as_deref()))
                        .unwrap_or("unknown caller");
                    println!(
                        "  {} ({}) {} - {}",
                        c.call_id().unwrap_or("-"),
                        c.base.short_id(),
                        c.call_info.started_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                        caller
                    );
                }
            }
        }
        DocumentKind::Inventory => {
            let items: Vec<Inventory> = repo.list()?;
            if json {
                print_json(&items)?;
            } else if items.is_empty() {
                println!("No inventory found.");
            } else {
                println!("Inventory:\n");
                for i in items {
                    println!(
                        "  {} ({}) {} - {} available / {} on hand",
                        i.sku,
                        i.base.short_id(),
                        i.name,
                        i.stock.available,
                        i.stock.current
                    );
                }
            }
        }
        DocumentKind::File => {
            let files: Vec<FileRecord> = repo.list()?;
            if json {
                print_json(&files)?;
            } else if files.is_empty() {
                println!("No files found.");
            } else {
                println!("Files:\n");
                for f in files {
                    println!(
                        "  {} ({}) [{}] owner:{} ({}) downloads:{}",
                        f.storage_key,
                        f.base.short_id(),
                        f.category,
                        f.owner.user_id,
                        f.owner.role,
                        f.download_count
                    );
                }
            }
        }
    }

    Ok(())
}

pub fn handle_get(kind: String, key: String, json: bool) -> Result<()> {
    let repo = open_repository()?;

    match parse_enum::<DocumentKind>(&kind)? {
        DocumentKind::Order => {
            let o: Order = repo.resolve(&key)?;
            if json {
                return print_json(&o);
            }
            println!("Order {} ({})", o.order_id().unwrap_or("-"), o.base.id);
            println!("Source: {}", o.order_info.source);
            println!("Type: {}", o.order_info.order_type);
            println!("Status: {}", o.status);
            for item in &o.items {
                println!(
                    "  {} x{} @ {:.2} = {:.2}",
                    item.name, item.quantity, item.unit_price, item.total
                );
            }
            println!("Total: {:.2}", o.pricing.total);
            println!("History:");
            for change in &o.status_history {
                let note = change
                    .note
                    .as_deref()
                    .map(|n| format!(" ({})", n))
                    .unwrap_or_default();
                println!("  {} {}{}", change.at.format("%Y-%m-%d %H:%M"), change.status, note);
            }
        }
        DocumentKind::Call => {
            let c: Call = repo.resolve(&key)?;
            if json {
                return print_json(&c);
            }
            println!("Call {} ({})", c.call_id().unwrap_or("-"), c.base.id);
            println!("Started: {}", c.call_info.started_at.format("%Y-%m-%d %H:%M"));
            if let Some(ref customer) = c.customer {
                if let Some(ref name) = customer.name {
                    println!("Caller: {}", name);
                }
                if let Some(ref phone) = customer.phone {
                    println!("Phone: {}", phone);
                }
            }
            for (k, v) in &c.details {
                println!("  {}: {}", k, v);
            }
        }
        DocumentKind::Inventory => {
            let i: Inventory = repo.resolve(&key)?;
            if json {
                return print_json(&i);
            }
            println!("Inventory {} ({})", i.sku, i.base.id);
            println!("Name: {}", i.name);
            print_inventory_summary(&i);
        }
        DocumentKind::File => {
            let f: FileRecord = repo.resolve(&key)?;
            if json {
                return print_json(&f);
            }
            println!("File {} ({})", f.storage_key, f.base.id);
            println!("Owner: {} ({})", f.owner.user_id, f.owner.role);
            println!("Category: {}", f.category);
            println!("Size: {} bytes", f.size);
            println!("Downloads: {}", f.download_count);
            if let Some(at) = f.last_accessed {
                println!("Last accessed: {}", at.format("%Y-%m-%d %H:%M"));
            }
        }
    }

    Ok(())
}

fn print_inventory_summary(item: &Inventory) {
    let stock = &item.stock;
    println!(
        "  stock: {} on hand, {} reserved, {} available (min {}, max {})",
        stock.current, stock.reserved, stock.available, stock.minimum, stock.maximum
    );
    let margin = item
        .pricing
        .margin
        .map(|m| format!("{:.1}%", m))
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "  pricing: cost {:.2}, price {:.2}, margin {}",
        item.pricing.cost, item.pricing.price, margin
    );

    let alerts = item.alerts;
    let flags: Vec<&str> = [
        (alerts.low_stock, "low_stock"),
        (alerts.out_of_stock, "out_of_stock"),
        (alerts.overstock, "overstock"),
        (alerts.expiring_soon, "expiring_soon"),
    ]
    .iter()
    .filter(|(on, _)| *on)
    .map(|(_, name)| *name)
    .collect();
    if !flags.is_empty() {
        println!("  alerts: {}", flags.join(", "));
    }
}

/// Parse a line item in format "name:quantity:unit_price[:modifier=price,...]"
fn parse_item(s: &str) -> Result<OrderItem> {
    let parts: Vec<&str> = s.splitn(4, ':').collect();
    if parts.len() < 3 {
        return Err(VbmsError::InvalidValue(format!(
            "Invalid item '{}'. Expected 'name:quantity:unit_price'",
            s
        )));
    }

    let quantity: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| VbmsError::InvalidValue(format!("Invalid quantity in item: {}", s)))?;
    let unit_price: f64 = parts[2]
        .trim()
        .parse()
        .map_err(|_| VbmsError::InvalidValue(format!("Invalid price in item: {}", s)))?;

    let mut modifiers = Vec::new();
    if let Some(raw) = parts.get(3) {
        for m in raw.split(',').filter(|m| !m.trim().is_empty()) {
            let (name, price) = parse_key_value(m)?;
            let price: f64 = price.parse().map_err(|_| {
                VbmsError::InvalidValue(format!("Invalid modifier price: {}", m))
            })?;
            modifiers.push(Modifier {
                name: name.to_string(),
                price,
            });
        }
    }

    OrderItem::with_modifiers(parts[0].trim().to_string(), quantity, unit_price, modifiers)
}

fn parse_key_value(s: &str) -> Result<(&str, &str)> {
    s.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| VbmsError::InvalidValue(format!("Expected 'key=value', got '{}'", s)))
}

/// Dates are taken as midnight UTC of the given day
fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| VbmsError::InvalidValue(format!("Invalid date '{}'. Expected YYYY-MM-DD", s)))
}
