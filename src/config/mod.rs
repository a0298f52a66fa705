pub mod map_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, Facility};

#[cfg(feature = "cli")]
pub mod cli {
    use crate::domain::model::{Coordinate, PlaceCategory};
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_path, Validate};
    use clap::{Parser, Subcommand, ValueEnum};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "rescue-map")]
    #[command(about = "Emergency map: alert contacts, find nearby help, route to it")]
    pub struct CliConfig {
        /// TOML configuration file; defaults apply when omitted
        #[arg(short, long, global = true)]
        pub config: Option<String>,

        /// Current latitude (location is unavailable when omitted)
        #[arg(long, global = true, allow_hyphen_values = true)]
        pub lat: Option<f64>,

        /// Current longitude
        #[arg(long, global = true, allow_hyphen_values = true)]
        pub lon: Option<f64>,

        /// Directory to write the rendered map to, as map.geojson
        #[arg(long, global = true)]
        pub snapshot: Option<String>,

        /// Log as JSON lines instead of compact text
        #[arg(long, global = true)]
        pub json_logs: bool,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Send the emergency message with a map link to every recipient
        Alert,
        /// Find nearby facilities and navigate to one of them
        Nearby {
            #[arg(value_enum)]
            facility: Facility,

            /// 1-based option to navigate to; prompts on stdin when omitted
            #[arg(long)]
            pick: Option<usize>,
        },
        /// Draw the driving route to a destination
        Route {
            /// Destination as "lat,lon"
            #[arg(long, allow_hyphen_values = true)]
            to: Coordinate,
        },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum Facility {
        Hospital,
        Police,
    }

    impl Facility {
        pub fn category(self) -> PlaceCategory {
            match self {
                Facility::Hospital => PlaceCategory::hospital(),
                Facility::Police => PlaceCategory::police(),
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if let Some(snapshot) = &self.snapshot {
                validate_path("snapshot", snapshot)?;
            }
            if let Some(config) = &self.config {
                validate_path("config", config)?;
            }
            Ok(())
        }
    }

}
