use clap::{Parser, Subcommand};
use medtour_core::config::{api_base_url_from_env_value, request_timeout_from_env_value};
use medtour_core::content::recent_offers;
use medtour_core::{
    hospital_doctors, location_keys, normalize, related_doctors, CatalogApi, CoreConfig,
    EntitySearchAggregator, FilterSelection, FilteredListController, HttpCatalogClient,
    ListStatus, LocationIndex, Page, RelatedSource, SearchOutcome,
};
use medtour_types::{stars, Doctor, Star};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medtour")]
#[command(about = "Medtour catalogue CLI")]
struct Cli {
    /// Catalogue backend base URL (overrides MEDTOUR_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search doctors, treatments and hospitals
    Search {
        /// Free-text query (at least three characters)
        query: String,
        /// Maximum results per request
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List doctors, best rated first, with hospital names
    Doctors {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        specialization: Option<String>,
    },
    /// List treatments, best rated first
    Treatments {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        treatment_type: Option<String>,
        /// Ayushman-scheme treatments only
        #[arg(long)]
        ayushman: bool,
    },
    /// Suggest up to three doctors for a treatment name
    Related {
        /// Treatment name, e.g. "Cardiac Bypass Surgery"
        treatment: String,
    },
    /// List the doctors of one hospital, best rated first
    HospitalDoctors {
        hospital_id: i64,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show the newest treatment offers
    Offers,
    /// Show how raw location strings normalise (offline)
    Locations {
        /// Raw location values, e.g. "Indore, MP"
        #[arg(required = true)]
        raw: Vec<String>,
    },
}

fn render_stars(rating: Option<f64>) -> String {
    stars(rating)
        .iter()
        .map(|star| match star {
            Star::Full => '★',
            Star::Half => '⯨',
            Star::Empty => '☆',
        })
        .collect()
}

fn print_doctor(doctor: &Doctor) {
    println!(
        "{} {} - {}",
        render_stars(doctor.rating),
        doctor.name,
        doctor.specialization.as_deref().unwrap_or("General")
    );
}

fn core_config(api_url: Option<String>) -> anyhow::Result<CoreConfig> {
    let api_url =
        api_base_url_from_env_value(api_url.or_else(|| std::env::var("MEDTOUR_API_URL").ok()));
    let timeout =
        request_timeout_from_env_value(std::env::var("MEDTOUR_REQUEST_TIMEOUT_SECS").ok())?;
    Ok(CoreConfig::new(api_url, timeout)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medtour_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Use 'medtour --help' for commands");
            return Ok(());
        }
    };

    if let Commands::Locations { raw } = &command {
        let index = LocationIndex::from_locations(raw.iter().map(|r| Some(r.as_str())));
        for value in raw {
            let keys: Vec<String> = location_keys(Some(value))
                .iter()
                .map(|key| format!("{} ({})", index.label(key), key))
                .collect();
            println!(
                "{:?} -> key {:?}; places: {}",
                value,
                normalize(Some(value)).as_str(),
                if keys.is_empty() {
                    "none".to_string()
                } else {
                    keys.join(", ")
                }
            );
        }
        return Ok(());
    }

    let cfg = core_config(cli.api_url)?;
    let client = Arc::new(HttpCatalogClient::new(&cfg)?);

    match command {
        Commands::Search { query, limit } => {
            let aggregator = EntitySearchAggregator::new(client, &cfg);
            match aggregator
                .search(&query, limit.unwrap_or(cfg.search_limit()))
                .await
            {
                SearchOutcome::Applied(found) => {
                    println!("{} result(s) for {:?}", found.total_results, found.query);
                    for doctor in &found.results.doctors {
                        println!(
                            "  doctor    {} {} - {}",
                            render_stars(doctor.rating),
                            doctor.name,
                            doctor.specialization.as_deref().unwrap_or("General")
                        );
                    }
                    for treatment in &found.results.treatments {
                        println!(
                            "  treatment {} {} - {}",
                            render_stars(treatment.rating),
                            treatment.name,
                            treatment.price_label()
                        );
                    }
                    for hospital in &found.results.hospitals {
                        println!(
                            "  hospital  {} {} - {}",
                            render_stars(hospital.rating),
                            hospital.name,
                            hospital.location.as_deref().unwrap_or("")
                        );
                    }
                }
                SearchOutcome::Skipped => eprintln!(
                    "Query must be at least {} characters",
                    cfg.min_query_chars()
                ),
                SearchOutcome::Failed(e) => eprintln!("Error searching: {}", e),
                SearchOutcome::Superseded => {}
            }
        }
        Commands::Doctors {
            location,
            specialization,
        } => {
            let controller = FilteredListController::doctors(client, &cfg);
            let selection = FilterSelection::new(location.as_deref(), specialization.as_deref());
            if !selection.is_empty() {
                if let Err(e) = controller.refresh_options().await {
                    eprintln!("Warning: could not load location labels: {}", e);
                }
            }
            if let Some(result) = controller.load(selection).await.current() {
                match result.status {
                    ListStatus::Unavailable => eprintln!("Error: catalogue backend unavailable"),
                    ListStatus::Empty => println!("No doctors found."),
                    ListStatus::Populated => {
                        for listing in &result.items {
                            println!(
                                "{} {} - {} - {}",
                                render_stars(listing.item.rating),
                                listing.item.name,
                                listing.item.specialization.as_deref().unwrap_or("General"),
                                listing.hospital_name.as_deref().unwrap_or("-")
                            );
                        }
                    }
                }
            }
        }
        Commands::Treatments {
            location,
            treatment_type,
            ayushman,
        } => {
            let controller = if ayushman {
                FilteredListController::ayushman_treatments(client, &cfg)
            } else {
                FilteredListController::treatments(client, &cfg)
            };
            let selection = FilterSelection::new(location.as_deref(), treatment_type.as_deref());
            if !selection.is_empty() {
                if let Err(e) = controller.refresh_options().await {
                    eprintln!("Warning: could not load location labels: {}", e);
                }
            }
            if let Some(result) = controller.load(selection).await.current() {
                match result.status {
                    ListStatus::Unavailable => eprintln!("Error: catalogue backend unavailable"),
                    ListStatus::Empty => println!("No treatments found."),
                    ListStatus::Populated => {
                        for listing in &result.items {
                            println!(
                                "{} {} - {} - {}",
                                render_stars(listing.item.rating),
                                listing.item.name,
                                listing.item.treatment_type.as_deref().unwrap_or("General"),
                                listing.item.price_label()
                            );
                        }
                    }
                }
            }
        }
        Commands::Related { treatment } => {
            let related = related_doctors(client.as_ref(), &treatment).await;
            match &related.source {
                RelatedSource::TreatmentName => println!("Doctors for {:?}:", treatment),
                RelatedSource::Keyword(keyword) => println!("Doctors matching {:?}:", keyword),
                RelatedSource::TopDoctors => println!("No close match; top doctors:"),
                RelatedSource::Unavailable => eprintln!("Error: catalogue backend unavailable"),
            }
            related.doctors.iter().for_each(print_doctor);
        }
        Commands::HospitalDoctors { hospital_id, limit } => {
            let page = limit.map(Page::first).unwrap_or_else(|| Page::first(cfg.page_limit()));
            match hospital_doctors(client.as_ref(), hospital_id, page).await {
                Ok(doctors) if doctors.is_empty() => println!("No doctors found."),
                Ok(doctors) => doctors.iter().for_each(print_doctor),
                Err(e) => eprintln!("Error listing doctors: {}", e),
            }
        }
        Commands::Offers => match client.offers(Page::default()).await {
            Ok(offers) => {
                let now = chrono::Utc::now();
                for offer in recent_offers(&offers) {
                    let discount = offer
                        .discount_percentage
                        .map(|d| format!("{d:.0}% off"))
                        .unwrap_or_else(|| "free camp".to_string());
                    let status = if offer.is_expired(now) { " (expired)" } else { "" };
                    println!(
                        "{} - {} - {}{}",
                        offer.name,
                        discount,
                        offer.location.as_deref().unwrap_or("-"),
                        status
                    );
                }
            }
            Err(e) => eprintln!("Error loading offers: {}", e),
        },
        Commands::Locations { .. } => {}
    }

    Ok(())
}
