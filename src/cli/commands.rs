use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vbms")]
#[command(version, about = "Back-office tool for VBMS orders, calls, inventory and files")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new vbms workspace in the current directory
    Init,

    /// Create orders and move them through their lifecycle
    Order(OrderCommand),

    /// Log incoming calls
    Call(CallCommand),

    /// Manage inventory records
    Inventory(InventoryCommand),

    /// Register stored files and track downloads
    File(FileCommand),

    /// List records of one kind
    List {
        /// Record kind (order, call, inventory, file)
        #[arg(value_name = "KIND")]
        kind: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single record
    Get {
        /// Record kind (order, call, inventory, file)
        #[arg(value_name = "KIND")]
        kind: String,

        /// Display id (order/call id, SKU, storage key) or UUID prefix
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct OrderCommand {
    #[command(subcommand)]
    pub action: OrderAction,
}

#[derive(Subcommand, Debug)]
pub enum OrderAction {
    /// Create a new order
    Add {
        /// Channel the order came in through (phone, online, walk_in, ai_assistant)
        #[arg(long, default_value = "phone")]
        source: String,

        /// Fulfillment mode (pickup, delivery, dine_in)
        #[arg(long = "type", default_value = "pickup")]
        order_type: String,

        /// Line item as "name:quantity:unit_price[:modifier=price,...]" (repeatable)
        #[arg(long = "item", short = 'i')]
        items: Vec<String>,

        #[arg(long, default_value_t = 0.0)]
        subtotal: f64,

        #[arg(long, default_value_t = 0.0)]
        tax: f64,

        #[arg(long, default_value_t = 0.0)]
        tip: f64,

        #[arg(long, default_value_t = 0.0)]
        fees: f64,

        #[arg(long, default_value_t = 0.0)]
        discount: f64,

        #[arg(long, default_value_t = 0.0)]
        total: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move an order to a new status
    Status {
        /// Order id (VBMS-...) or UUID prefix
        order: String,

        /// New status
        status: String,

        /// Note stored with the status change
        #[arg(long)]
        note: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct CallCommand {
    #[command(subcommand)]
    pub action: CallAction,
}

#[derive(Subcommand, Debug)]
pub enum CallAction {
    /// Log a new call
    Add {
        /// Caller name
        #[arg(long)]
        name: Option<String>,

        /// Caller phone number
        #[arg(long)]
        phone: Option<String>,

        /// Free-form detail as "key=value" (repeatable)
        #[arg(long = "detail", short = 'd')]
        details: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct InventoryCommand {
    #[command(subcommand)]
    pub action: InventoryAction,
}

#[derive(Subcommand, Debug)]
pub enum InventoryAction {
    /// Add an inventory record
    Add {
        /// Item name
        name: String,

        /// Unique stock-keeping unit
        #[arg(long)]
        sku: String,

        #[arg(long, default_value_t = 0)]
        current: i64,

        #[arg(long, default_value_t = 0)]
        reserved: i64,

        /// Reorder threshold (defaults to the workspace config)
        #[arg(long)]
        minimum: Option<i64>,

        /// Overstock threshold (defaults to the workspace config)
        #[arg(long)]
        maximum: Option<i64>,

        #[arg(long, default_value_t = 0.0)]
        cost: f64,

        #[arg(long, default_value_t = 0.0)]
        price: f64,

        /// Expiration date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change fields of an inventory record
    Update {
        /// SKU or UUID prefix
        key: String,

        #[arg(long)]
        current: Option<i64>,

        #[arg(long)]
        reserved: Option<i64>,

        #[arg(long)]
        minimum: Option<i64>,

        #[arg(long)]
        maximum: Option<i64>,

        #[arg(long)]
        cost: Option<f64>,

        #[arg(long)]
        price: Option<f64>,

        /// Expiration date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_expiration")]
        expires: Option<String>,

        /// Remove the expiration date
        #[arg(long)]
        clear_expiration: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show stock warnings for all records
    Alerts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct FileCommand {
    #[command(subcommand)]
    pub action: FileAction,
}

#[derive(Subcommand, Debug)]
pub enum FileAction {
    /// Register a stored file
    Add {
        /// Object-storage key
        storage_key: String,

        /// Owning user id
        #[arg(long)]
        owner: String,

        /// Owner role (main_admin, admin, customer)
        #[arg(long, default_value = "customer")]
        role: String,

        /// Size in bytes
        #[arg(long, default_value_t = 0)]
        size: u64,

        /// Category (document, image, audio, invoice, other)
        #[arg(long, default_value = "other")]
        category: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a download of a file
    Access {
        /// Storage key or UUID prefix
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
