mod commands;
mod handlers;

pub use commands::{
    CallAction, CallCommand, Cli, Commands, FileAction, FileCommand, InventoryAction,
    InventoryCommand, OrderAction, OrderCommand,
};
pub use handlers::{
    handle_call_add, handle_file_access, handle_file_add, handle_get, handle_init,
    handle_inventory_add, handle_inventory_alerts, handle_inventory_update, handle_list,
    handle_order_add, handle_order_status,
};
