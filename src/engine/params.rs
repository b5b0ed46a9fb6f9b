use super::error::Error;
use serde::Deserialize;
use std::sync::OnceLock;

const DEFAULT_PARAMS_TOML: &str = include_str!("../../resources/default.layout.toml");

static DEFAULT_PARAMS: OnceLock<ForceParams> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ForceParams {
    #[serde(default)]
    pub link: LinkParams,
    #[serde(default)]
    pub charge: ChargeParams,
    #[serde(default)]
    pub center: CenterParams,
    #[serde(default)]
    pub collision: CollisionParams,
    #[serde(default)]
    pub cooling: CoolingParams,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkParams {
    #[serde(default = "default_link_distance")]
    pub distance: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

fn default_link_distance() -> f64 {
    300.0
}
fn default_iterations() -> usize {
    1
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            distance: default_link_distance(),
            iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChargeParams {
    #[serde(default = "default_charge_strength")]
    pub strength: f64,
    #[serde(default = "default_charge_distance_min")]
    pub distance_min: f64,
}

fn default_charge_strength() -> f64 {
    -800.0
}
fn default_charge_distance_min() -> f64 {
    1.0
}

impl Default for ChargeParams {
    fn default() -> Self {
        Self {
            strength: default_charge_strength(),
            distance_min: default_charge_distance_min(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CenterParams {
    #[serde(default = "default_center_strength")]
    pub strength: f64,
}

fn default_center_strength() -> f64 {
    1.0
}

impl Default for CenterParams {
    fn default() -> Self {
        Self {
            strength: default_center_strength(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollisionParams {
    #[serde(default = "default_collision_margin")]
    pub margin: f64,
    #[serde(default = "default_collision_strength")]
    pub strength: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

fn default_collision_margin() -> f64 {
    5.0
}
fn default_collision_strength() -> f64 {
    1.0
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            margin: default_collision_margin(),
            strength: default_collision_strength(),
            iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoolingParams {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_alpha_min")]
    pub alpha_min: f64,
    #[serde(default = "default_alpha_decay")]
    pub alpha_decay: f64,
    #[serde(default)]
    pub alpha_target: f64,
    #[serde(default = "default_velocity_decay")]
    pub velocity_decay: f64,
}

fn default_alpha() -> f64 {
    1.0
}
fn default_alpha_min() -> f64 {
    0.001
}
fn default_alpha_decay() -> f64 {
    1.0 - default_alpha_min().powf(1.0 / 300.0)
}
fn default_velocity_decay() -> f64 {
    0.4
}

impl Default for CoolingParams {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            alpha_min: default_alpha_min(),
            alpha_decay: default_alpha_decay(),
            alpha_target: 0.0,
            velocity_decay: default_velocity_decay(),
        }
    }
}

impl ForceParams {
    /// Rejects values that would stall the simulation or make it diverge.
    pub fn validate(&self) -> Result<(), Error> {
        let c = &self.cooling;
        if !(c.alpha_min > 0.0 && c.alpha_min.is_finite()) {
            return Err(Error::invalid_config("cooling.alpha_min must be positive"));
        }
        if !(0.0..=1.0).contains(&c.alpha_decay) {
            return Err(Error::invalid_config(
                "cooling.alpha_decay must lie in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&c.velocity_decay) {
            return Err(Error::invalid_config(
                "cooling.velocity_decay must lie in [0, 1]",
            ));
        }
        if !(c.alpha.is_finite() && c.alpha >= 0.0) || !(0.0..=1.0).contains(&c.alpha_target) {
            return Err(Error::invalid_config(
                "cooling.alpha and cooling.alpha_target must be non-negative",
            ));
        }
        if !(self.charge.distance_min > 0.0) {
            return Err(Error::invalid_config(
                "charge.distance_min must be positive",
            ));
        }
        if !(self.link.distance.is_finite() && self.link.distance >= 0.0) {
            return Err(Error::invalid_config("link.distance must be non-negative"));
        }
        if self.link.iterations == 0 || self.collision.iterations == 0 {
            return Err(Error::invalid_config("force iterations must be at least 1"));
        }
        if !(self.collision.margin.is_finite() && self.collision.margin >= 0.0) {
            return Err(Error::invalid_config(
                "collision.margin must be non-negative",
            ));
        }
        Ok(())
    }
}

pub fn load_parameters(custom_toml: Option<&str>) -> Result<ForceParams, Error> {
    let params = match custom_toml {
        Some(toml) => toml::from_str::<ForceParams>(toml)?,
        None => get_default_parameters().clone(),
    };
    params.validate()?;
    Ok(params)
}

pub fn get_default_parameters() -> &'static ForceParams {
    DEFAULT_PARAMS.get_or_init(|| {
        toml::from_str(DEFAULT_PARAMS_TOML)
            .expect("Failed to parse embedded default layout parameters. This is a library bug.")
    })
}
