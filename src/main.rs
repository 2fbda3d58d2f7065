use std::sync::Arc;

use ensemble_engine::config::EngineConfig;
use ensemble_engine::data::{read_ensemble_from_file, Ensemble};
use ensemble_engine::network::{proximity_network, Network};
use ensemble_engine::{pointwise_min_distances, DistanceEngine, DistanceMatrix, DistanceVector};
use ensemble_engine::{GeoCoordinate, Line};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static SAMPLE_ENSEMBLE: Lazy<Ensemble> = Lazy::new(|| {
    // Two members with two short diagonal lines each; used when no dataset is configured.
    let diagonal = |id: &str, from: i32| {
        Line::new(
            id,
            (from..from + 4)
                .map(|d| GeoCoordinate::new(d as f64, d as f64))
                .collect(),
        )
    };
    Ensemble {
        sim_start: "sample".into(),
        time_offset: 0,
        lines: vec![
            diagonal("0|1", 0),
            diagonal("0|2", 20),
            diagonal("1|1", 1),
            diagonal("1|2", 22),
        ],
    }
});

struct AppState {
    ensemble: Ensemble,
    engine: DistanceEngine,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EngineRequest {
    Lines {
        #[serde(default)]
        member: Option<u32>,
    },
    Distances {
        line_id: String,
    },
    Pairwise {
        source_id: String,
        target_id: String,
    },
    Network {
        max_distance: f64,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EngineResponse {
    Lines {
        sim_start: String,
        time_offset: i64,
        lines: Vec<Line>,
    },
    Distances {
        line_id: String,
        target_ids: Vec<String>,
        distances: DistanceMatrix,
    },
    Pairwise {
        distances: DistanceVector,
    },
    Network {
        network: Network,
    },
    Error {
        message: String,
    },
}

fn handle(state: &AppState, req: EngineRequest) -> EngineResponse {
    let ensemble = &state.ensemble;
    match req {
        EngineRequest::Lines { member } => {
            let lines = match member {
                Some(m) => ensemble.member_lines(m).cloned().collect(),
                None => ensemble.lines.clone(),
            };
            EngineResponse::Lines {
                sim_start: ensemble.sim_start.clone(),
                time_offset: ensemble.time_offset,
                lines,
            }
        }
        EngineRequest::Distances { line_id } => {
            let Some(source) = ensemble.line(&line_id) else {
                return EngineResponse::Error { message: format!("Unknown line_id {}", line_id) };
            };
            let distances = state.engine.all_pair_distances(source, &ensemble.lines);
            EngineResponse::Distances {
                target_ids: ensemble.lines.iter().map(|l| l.id().to_string()).collect(),
                line_id,
                distances,
            }
        }
        EngineRequest::Pairwise { source_id, target_id } => {
            let Some(source) = ensemble.line(&source_id) else {
                return EngineResponse::Error { message: format!("Unknown source_id {}", source_id) };
            };
            let Some(target) = ensemble.line(&target_id) else {
                return EngineResponse::Error { message: format!("Unknown target_id {}", target_id) };
            };
            EngineResponse::Pairwise {
                distances: pointwise_min_distances(source, target),
            }
        }
        EngineRequest::Network { max_distance } => {
            if max_distance.is_nan() || max_distance < 0.0 {
                return EngineResponse::Error {
                    message: format!("max_distance must be non-negative, got {}", max_distance),
                };
            }
            EngineResponse::Network {
                network: proximity_network(&ensemble.lines, max_distance),
            }
        }
    }
}

async fn handler(state: Arc<AppState>, event: LambdaEvent<EngineRequest>) -> Result<EngineResponse, Error> {
    Ok(handle(&state, event.payload))
}

fn load_state(config: &EngineConfig) -> Result<AppState, Error> {
    let ensemble = match &config.dataset_path {
        Some(path) => read_ensemble_from_file(path)?,
        None => {
            warn!("no dataset configured, serving the built-in sample ensemble");
            SAMPLE_ENSEMBLE.clone()
        }
    };
    let engine = DistanceEngine::new(config.workers)?;
    info!(
        "serving {} lines with {} distance workers",
        ensemble.lines.len(),
        engine.workers()
    );
    Ok(AppState { ensemble, engine })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let config = EngineConfig::from_env()?;
    let state = Arc::new(load_state(&config)?);
    let func = service_fn(move |event| handler(Arc::clone(&state), event));
    lambda_runtime::run(func).await
}
