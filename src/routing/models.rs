//! Reachable-range and EV route request models

use crate::error::{Result, SearchError};
use crate::search::Location;

/// Speed/consumption pairs (km/h,kWh per 100 km) used when the caller sends none
pub const DEFAULT_CONSUMPTION_CURVE: &str = "50,15:80,20:120,30";

/// Route type for range and route calculation
pub const DEFAULT_ROUTE_TYPE: &str = "eco";

/// Power drawn by auxiliary systems (climate, electronics) in kW
pub const DEFAULT_AUXILIARY_POWER_KW: f64 = 1.7;

/// Area reachable from one point on a given energy budget
#[derive(Debug, Clone, PartialEq)]
pub struct ReachableRangeQuery {
    pub origin: Location,
    pub energy_budget_kwh: f64,
    pub route_type: String,
    pub consumption_curve: String,
}

impl ReachableRangeQuery {
    pub fn new(origin: Location, energy_budget_kwh: f64) -> Result<Self> {
        Ok(Self {
            origin,
            energy_budget_kwh: positive("energyBudgetInkWh", energy_budget_kwh)?,
            route_type: DEFAULT_ROUTE_TYPE.to_string(),
            consumption_curve: DEFAULT_CONSUMPTION_CURVE.to_string(),
        })
    }

    /// Override the route type; blank values keep the default
    pub fn with_route_type(mut self, route_type: Option<String>) -> Self {
        if let Some(route_type) = route_type.filter(|r| !r.trim().is_empty()) {
            self.route_type = route_type;
        }
        self
    }

    /// Override the consumption curve; blank values keep the default
    pub fn with_consumption_curve(mut self, curve: Option<String>) -> Result<Self> {
        if let Some(curve) = non_blank(curve) {
            self.consumption_curve = consumption_curve(curve)?;
        }
        Ok(self)
    }
}

/// Charge-aware route between two waypoints
#[derive(Debug, Clone, PartialEq)]
pub struct EvRouteQuery {
    pub origin: Location,
    pub destination: Location,
    pub current_charge_kwh: f64,
    pub max_charge_kwh: f64,
    pub auxiliary_power_kw: f64,
    pub consumption_curve: String,
}

impl EvRouteQuery {
    pub fn new(
        origin: Location,
        destination: Location,
        current_charge_kwh: f64,
        max_charge_kwh: f64,
    ) -> Result<Self> {
        let current_charge_kwh = positive("currentChargeInkWh", current_charge_kwh)?;
        let max_charge_kwh = positive("maxChargeInkWh", max_charge_kwh)?;
        if current_charge_kwh > max_charge_kwh {
            return Err(SearchError::InvalidParameter {
                name: "currentChargeInkWh",
                value: format!("{} exceeds maxChargeInkWh {}", current_charge_kwh, max_charge_kwh),
            });
        }

        Ok(Self {
            origin,
            destination,
            current_charge_kwh,
            max_charge_kwh,
            auxiliary_power_kw: DEFAULT_AUXILIARY_POWER_KW,
            consumption_curve: DEFAULT_CONSUMPTION_CURVE.to_string(),
        })
    }

    pub fn with_auxiliary_power(mut self, power_kw: Option<f64>) -> Result<Self> {
        if let Some(power_kw) = power_kw {
            if !power_kw.is_finite() || power_kw < 0.0 {
                return Err(SearchError::InvalidParameter {
                    name: "auxiliaryPowerInkW",
                    value: power_kw.to_string(),
                });
            }
            self.auxiliary_power_kw = power_kw;
        }
        Ok(self)
    }

    /// Override the consumption curve; blank values keep the default
    pub fn with_consumption_curve(mut self, curve: Option<String>) -> Result<Self> {
        if let Some(curve) = non_blank(curve) {
            self.consumption_curve = consumption_curve(curve)?;
        }
        Ok(self)
    }
}

/// Parse a `lat,lon` waypoint
pub fn parse_waypoint(name: &'static str, value: &str) -> Result<Location> {
    let invalid = || SearchError::InvalidParameter {
        name,
        value: value.to_string(),
    };
    let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    Location::new(lat, lon)
}

fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SearchError::InvalidParameter {
            name,
            value: value.to_string(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `speed,consumption` pairs joined by `:`, all numeric
fn consumption_curve(curve: String) -> Result<String> {
    let well_formed = curve.split(':').all(|pair| {
        let mut parts = pair.split(',');
        matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(speed), Some(consumption), None)
                if speed.trim().parse::<f64>().is_ok() && consumption.trim().parse::<f64>().is_ok()
        )
    });

    if well_formed {
        Ok(curve)
    } else {
        Err(SearchError::InvalidParameter {
            name: "constantSpeedConsumptionInkWhPerHundredkm",
            value: curve,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sf() -> Location {
        Location::new(37.77, -122.42).unwrap()
    }

    #[test]
    fn test_range_defaults() {
        let query = ReachableRangeQuery::new(sf(), 40.0)
            .unwrap()
            .with_route_type(Some(" ".into()))
            .with_consumption_curve(None)
            .unwrap();
        assert_eq!(query.route_type, "eco");
        assert_eq!(query.consumption_curve, DEFAULT_CONSUMPTION_CURVE);
    }

    #[test]
    fn test_range_rejects_empty_budget() {
        assert!(matches!(
            ReachableRangeQuery::new(sf(), 0.0),
            Err(SearchError::InvalidParameter { name: "energyBudgetInkWh", .. })
        ));
    }

    #[test]
    fn test_consumption_curve_format() {
        let query = ReachableRangeQuery::new(sf(), 40.0).unwrap();
        assert!(query.clone().with_consumption_curve(Some("60,12:100,22".into())).is_ok());
        assert!(query.clone().with_consumption_curve(Some("fast".into())).is_err());
        assert!(query.with_consumption_curve(Some("60,12,3".into())).is_err());
    }

    #[test]
    fn test_route_charge_bounds() {
        let la = Location::new(34.05, -118.24).unwrap();
        let route = EvRouteQuery::new(sf(), la, 40.0, 75.0).unwrap();
        assert_eq!(route.auxiliary_power_kw, DEFAULT_AUXILIARY_POWER_KW);

        assert!(EvRouteQuery::new(sf(), la, 80.0, 75.0).is_err());
        assert!(route.with_auxiliary_power(Some(-1.0)).is_err());
    }

    #[test]
    fn test_parse_waypoint() {
        let location = parse_waypoint("origin", "37.77, -122.42").unwrap();
        assert_eq!(location, sf());
        assert!(parse_waypoint("origin", "37.77").is_err());
        assert!(parse_waypoint("origin", "north,south").is_err());
        assert!(matches!(
            parse_waypoint("destination", "95,0"),
            Err(SearchError::InvalidLocation { .. })
        ));
    }
}
