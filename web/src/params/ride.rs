use super::{invalid, require_min_length};
use crate::Error;
use domain::otp::OTP_LENGTH;
use domain::vehicle_class::VehicleClass;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateParams {
    pub(crate) pickup: String,
    pub(crate) destination: String,
    pub(crate) vehicle_type: VehicleClass,
}

impl CreateParams {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        require_min_length("pickup", &self.pickup)?;
        require_min_length("destination", &self.destination)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct FareParams {
    pub(crate) pickup: String,
    pub(crate) destination: String,
}

impl FareParams {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        require_min_length("pickup", &self.pickup)?;
        require_min_length("destination", &self.destination)
    }
}

/// Body of both confirm and end requests.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RideIdParams {
    pub(crate) ride_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub(crate) struct StartParams {
    pub(crate) ride_id: Uuid,
    pub(crate) otp: String,
}

impl StartParams {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.otp.len() != OTP_LENGTH || !self.otp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(format!("otp must be {OTP_LENGTH} digits")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(otp: &str) -> StartParams {
        StartParams {
            ride_id: Uuid::new_v4(),
            otp: otp.to_string(),
        }
    }

    #[test]
    fn otp_must_be_six_digits() {
        assert!(start("483920").validate().is_ok());
        assert!(start("48392").validate().is_err());
        assert!(start("4839201").validate().is_err());
        assert!(start("48392a").validate().is_err());
    }

    #[test]
    fn create_params_use_client_field_names() {
        let params: CreateParams = serde_json::from_str(
            r#"{"pickup": "12.97,77.59", "destination": "12.93,77.62", "vehicleType": "moto"}"#,
        )
        .unwrap();

        assert_eq!(params.vehicle_type, VehicleClass::Moto);
        assert!(params.validate().is_ok());
    }
}
