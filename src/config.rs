use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::profile::{FaultCode, FaultProfile};

fn default_fc1_flag() -> String {
    FaultCode::Fc1.default_flag_col().to_string()
}

fn default_fc2_flag() -> String {
    FaultCode::Fc2.default_flag_col().to_string()
}

/// Fault condition one: supply fan at high speed without reaching the duct
/// static pressure setpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuctStaticConfig {
    pub vfd_speed_percent_err_thres: f64,
    pub vfd_speed_percent_max: f64,
    pub duct_static_inches_err_thres: f64,
    pub duct_static_col: String,
    pub supply_vfd_speed_col: String,
    pub duct_static_setpoint_col: String,
    #[serde(default = "default_fc1_flag")]
    pub flag_col: String,
}

/// Fault condition two: mixed air temperature outside the return/outside
/// air envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixTempConfig {
    pub mix_degf_err_thres: f64,
    pub return_degf_err_thres: f64,
    pub outdoor_degf_err_thres: f64,
    pub mat_col: String,
    pub rat_col: String,
    pub oat_col: String,
    #[serde(default = "default_fc2_flag")]
    pub flag_col: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "fault_code", rename_all = "lowercase")]
pub enum FaultConfig {
    Fc1(DuctStaticConfig),
    Fc2(MixTempConfig),
}

impl FaultConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn code(&self) -> FaultCode {
        match self {
            FaultConfig::Fc1(_) => FaultCode::Fc1,
            FaultConfig::Fc2(_) => FaultCode::Fc2,
        }
    }

    pub fn profile(&self) -> FaultProfile {
        match self {
            FaultConfig::Fc1(c) => FaultProfile::duct_static(
                &c.duct_static_col,
                &c.supply_vfd_speed_col,
                &c.duct_static_setpoint_col,
                c.vfd_speed_percent_max,
                &c.flag_col,
            ),
            FaultConfig::Fc2(c) => FaultProfile::mix_temp(&c.mat_col, &c.rat_col, &c.oat_col, &c.flag_col),
        }
    }
}
