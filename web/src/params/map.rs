use super::require_min_length;
use crate::Error;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct CoordinatesParams {
    pub(crate) address: String,
}

impl CoordinatesParams {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        require_min_length("address", &self.address)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct DistanceTimeParams {
    pub(crate) origin: String,
    pub(crate) destination: String,
}

impl DistanceTimeParams {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        require_min_length("origin", &self.origin)?;
        require_min_length("destination", &self.destination)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct SuggestionsParams {
    pub(crate) input: String,
}

impl SuggestionsParams {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        require_min_length("input", &self.input)
    }
}
