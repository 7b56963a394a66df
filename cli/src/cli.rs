use std::path::PathBuf;

/// Choropleth map CLI
#[derive(clap::Parser, Debug)]
#[command(name = "choropleth", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Viewer configuration (JSON); defaults apply when omitted
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Draw a choropleth map to an SVG file
    Render(RenderArgs),

    /// Print the color domain and legend of an attribute
    Domain(DomainArgs),

    /// List the cities found in the boundary data
    Cities(DataArgs),

    /// Draw a paired bar chart comparing two attributes of one region
    Chart(ChartArgs),
}

#[derive(clap::Args, Debug)]
pub struct DataArgs {
    /// Boundary GeoJSON (path or URL)
    pub boundaries: String,

    /// Demographic table (path or URL)
    pub demographics: String,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
pub enum ScaleArg {
    #[default]
    Auto,
    Sequential,
    Diverging,
    Quantize,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Attribute to color regions by
    #[arg(short, long)]
    pub attribute: String,

    /// Color scale kind
    #[arg(long, value_enum, default_value_t = ScaleArg::Auto)]
    pub scale: ScaleArg,

    /// Share the color domain with a second attribute
    #[arg(long, conflicts_with = "scale")]
    pub joint: Option<String>,

    /// Zoom the projection to one city
    #[arg(long)]
    pub city: Option<String>,

    /// JSON array of gestures applied to the view before drawing
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub gestures: Option<PathBuf>,

    /// Output SVG file, defaults to "./map.svg"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Override the configured width
    #[arg(long)]
    pub width: Option<f64>,

    /// Override the configured height
    #[arg(long)]
    pub height: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct DomainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Attribute to scan
    #[arg(short, long)]
    pub attribute: String,

    /// Second attribute for a joint domain
    #[arg(long)]
    pub joint: Option<String>,

    /// Number of legend stops to print
    #[arg(long, default_value_t = 5)]
    pub stops: usize,
}

#[derive(clap::Args, Debug)]
pub struct ChartArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Region identifier
    #[arg(short, long)]
    pub region: String,

    /// Attribute drawn on the left of the center line
    #[arg(long)]
    pub left: String,

    /// Attribute drawn on the right of the center line
    #[arg(long)]
    pub right: String,

    /// Output SVG file, defaults to "./chart.svg"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
