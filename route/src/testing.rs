//! Elevation sources for tests.

use crate::{Coordinate, ElevationSource};
use async_trait::async_trait;
use std::{collections::VecDeque, sync::Mutex};
use tokio::sync::Notify;
use topodata::TopodataError;

/// Answers with pre-scripted results, in order.
#[derive(Default)]
pub(crate) struct Scripted {
    answers: Mutex<VecDeque<Result<f64, TopodataError>>>,
}

impl Scripted {
    pub(crate) fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Result<f64, TopodataError>>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }

    pub(crate) fn elevations<I: IntoIterator<Item = f64>>(elevations: I) -> Self {
        Self::new(elevations.into_iter().map(Ok))
    }

    pub(crate) fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[async_trait]
impl ElevationSource for Scripted {
    async fn elevation(&self, _coordinate: Coordinate) -> Result<f64, TopodataError> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("elevation source ran out of answers")
    }
}

/// Uses latitude as elevation, but holds lookups north of 80° until
/// released.
#[derive(Default)]
pub(crate) struct Gated {
    pub(crate) gate: Notify,
}

#[async_trait]
impl ElevationSource for Gated {
    async fn elevation(&self, coordinate: Coordinate) -> Result<f64, TopodataError> {
        if coordinate.latitude() > 80.0 {
            self.gate.notified().await;
        }
        Ok(coordinate.latitude())
    }
}

pub(crate) fn malformed() -> TopodataError {
    TopodataError::MalformedResponse("empty results".to_string())
}
