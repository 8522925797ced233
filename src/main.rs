mod api_client; mod classify; mod history; mod suggest; mod trend; mod ui;

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Runtime;

use api_client::ApiConfig;
use history::{FileStore, RecentSearches};
use ui::{run_loop, CityMarker, UiContext, UiEvent};

// Cities pinned on the station map.
const MAP_CITIES: [&str; 5] = ["Pune", "Mumbai", "Delhi", "Bangalore", "Chennai"];

struct AppCtx {
    api: ApiConfig,
    cities: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let ctx = Arc::new(AppCtx {
        api: ApiConfig::from_env(),
        cities: MAP_CITIES.iter().map(|s| s.to_string()).collect(),
    });
    let rt = Arc::new(Runtime::new()?);
    let (tx, rx) = mpsc::channel::<UiEvent>();

    let mut recent = RecentSearches::new(FileStore::open()?);
    let startup_list = recent.load();

    // Fill in the station map; a city that fails is reported and skipped,
    // the rest keep going.
    {
        let ctx = ctx.clone();
        let tx = tx.clone();
        rt.spawn(async move {
            for city in &ctx.cities {
                match api_client::fetch_city(&ctx.api, city).await {
                    Ok(feed) => {
                        let _ = tx.send(UiEvent::Marker(CityMarker {
                            city: city.clone(),
                            aqi: feed.aqi,
                            lat: feed.lat(),
                            lng: feed.lng(),
                        }));
                    }
                    Err(e) => {
                        let _ = tx.send(UiEvent::Status(format!("marker {}: {}", city, e)));
                    }
                }
            }
        });
    }

    let ui_ctx = UiContext {
        known_cities: ctx.cities.clone(),
        recent: startup_list,
    };

    let on_submit = {
        let ctx = ctx.clone();
        let rt = rt.clone();
        let tx = tx.clone();
        move |city: String| {
            let ctx = ctx.clone();
            let tx = tx.clone();
            rt.spawn(async move {
                match api_client::fetch_city(&ctx.api, &city).await {
                    Ok(feed) => {
                        let _ = tx.send(UiEvent::Report { city, feed });
                    }
                    Err(e) => {
                        let _ = tx.send(UiEvent::LookupFailed {
                            city,
                            detail: e.to_string(),
                        });
                    }
                }
            });
        }
    };

    // Runs on the UI path once a lookup succeeded; the persisted list is
    // the one the panel shows.
    let on_recorded = move |city: &str| match recent.record(city) {
        Ok(list) => list,
        Err(e) => {
            let _ = tx.send(UiEvent::Status(format!("history not saved: {}", e)));
            recent.load()
        }
    };

    run_loop(rx, ui_ctx, on_submit, on_recorded)
}
