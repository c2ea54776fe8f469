use std::error::Error;
use std::sync::Arc;

use dotenv::dotenv;
use log::{info, initialize_logger};
use structopt::StructOpt;

use brewlog::config::{get_data_dir, get_storage_kind};
use brewlog::environment::{Config, Environment};
use brewlog::record::RecordData;
use brewlog::store::RecordStore;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "seed-journal",
    about = "Create sample brewing records in the configured journal"
)]
struct Opt {
    /// How many records to create
    #[structopt(default_value = "3")]
    count: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let opt = Opt::from_args();

    let logger = Arc::new(initialize_logger());

    let config = Config::new(get_storage_kind(), get_data_dir());
    let environment = Environment::from_config(logger.clone(), config);
    let store = RecordStore::new(environment);

    info!(logger, "Seeding {} records...", opt.count);

    for number in 1..=opt.count {
        let data = RecordData {
            name: format!("Sample roast #{}", number),
            extraction_method: "paper drip".to_owned(),
            temperature: 92.0,
            coffee_amount: 15.0,
            water_amount: 225.0,
            acidity: 3.0,
            bitterness: 2.5,
            overall: 4,
            ..RecordData::default()
        };

        let id = store.create(data, None).await.expect("create record");

        let logger = logger.new(log::o!("id" => format!("{}", id)));
        info!(logger, "Created record #{}", number);
    }

    info!(logger, "Done");

    Ok(())
}
