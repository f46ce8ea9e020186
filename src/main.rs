use clap::Parser;
use tracing_subscriber::EnvFilter;
use vbms::cli::{
    handle_call_add, handle_file_access, handle_file_add, handle_get, handle_init,
    handle_inventory_add, handle_inventory_alerts, handle_inventory_update, handle_list,
    handle_order_add, handle_order_status, CallAction, Cli, Commands, FileAction,
    InventoryAction, OrderAction,
};

fn init_logging() {
    let filter = EnvFilter::try_from_env("VBMS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Order(order) => match order.action {
            OrderAction::Add {
                source,
                order_type,
                items,
                subtotal,
                tax,
                tip,
                fees,
                discount,
                total,
                json,
            } => handle_order_add(
                source, order_type, items, subtotal, tax, tip, fees, discount, total, json,
            ),
            OrderAction::Status {
                order,
                status,
                note,
                json,
            } => handle_order_status(order, status, note, json),
        },
        Commands::Call(call) => match call.action {
            CallAction::Add {
                name,
                phone,
                details,
                json,
            } => handle_call_add(name, phone, details, json),
        },
        Commands::Inventory(inventory) => match inventory.action {
            InventoryAction::Add {
                name,
                sku,
                current,
                reserved,
                minimum,
                maximum,
                cost,
                price,
                expires,
                json,
            } => handle_inventory_add(
                name, sku, current, reserved, minimum, maximum, cost, price, expires, json,
            ),
            InventoryAction::Update {
                key,
                current,
                reserved,
                minimum,
                maximum,
                cost,
                price,
                expires,
                clear_expiration,
                json,
            } => handle_inventory_update(
                key,
                current,
                reserved,
                minimum,
                maximum,
                cost,
                price,
                expires,
                clear_expiration,
                json,
            ),
            InventoryAction::Alerts { json } => handle_inventory_alerts(json),
        },
        Commands::File(file) => match file.action {
            FileAction::Add {
                storage_key,
                owner,
                role,
                size,
                category,
                json,
            } => handle_file_add(storage_key, owner, role, size, category, json),
            FileAction::Access { key, json } => handle_file_access(key, json),
        },
        Commands::List { kind, json } => handle_list(kind, json),
        Commands::Get { kind, key, json } => handle_get(kind, key, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
