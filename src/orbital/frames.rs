use chrono::{DateTime, Utc};
use nalgebra::{Rotation3, Vector3};

// ---------------------------------------------------------------------------
// WGS-84 reference ellipsoid
// ---------------------------------------------------------------------------

pub const WGS84_A: f64 = 6_378.137; // equatorial radius, km
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// J2000 reference epoch (2000-01-01T12:00:00 UTC) as a Unix timestamp.
const J2000_UNIX_SECONDS: f64 = 946_728_000.0;
const SECONDS_PER_JULIAN_YEAR: f64 = 365.25 * 86_400.0;

/// Geodetic subpoint: latitude/longitude in degrees, height above the ellipsoid in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}

/// Julian years since J2000, the epoch form SGP4's sidereal-time helpers take.
pub fn years_since_j2000(instant: &DateTime<Utc>) -> f64 {
    let unix = instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
    (unix - J2000_UNIX_SECONDS) / SECONDS_PER_JULIAN_YEAR
}

/// Greenwich mean sidereal time (IAU-82), rad in [0, 2π).
pub fn gmst(instant: &DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(years_since_j2000(instant)).rem_euclid(std::f64::consts::TAU)
}

/// Rotate a TEME vector into the Earth-fixed frame (polar motion ignored).
pub fn teme_to_ecef(pos: &Vector3<f64>, instant: &DateTime<Utc>) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst(instant)) * pos
}

/// Earth-fixed cartesian (km) to WGS-84 geodetic, iterating on latitude.
pub fn ecef_to_geodetic(pos: &Vector3<f64>) -> Geodetic {
    let p = (pos.x * pos.x + pos.y * pos.y).sqrt();
    let longitude = pos.y.atan2(pos.x).to_degrees();

    if p < 1e-9 {
        // On the polar axis
        let b = WGS84_A * (1.0 - WGS84_F);
        return Geodetic {
            latitude: 90.0_f64.copysign(pos.z),
            longitude: 0.0,
            altitude_km: pos.z.abs() - b,
        };
    }

    let mut lat = pos.z.atan2(p * (1.0 - WGS84_E2));
    let mut height = 0.0;
    for _ in 0..6 {
        let sin_lat = lat.sin();
        let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        height = p / lat.cos() - n;
        lat = pos.z.atan2(p * (1.0 - WGS84_E2 * n / (n + height)));
    }

    Geodetic {
        latitude: lat.to_degrees(),
        longitude: wrap_longitude(longitude),
        altitude_km: height,
    }
}

/// Fold a longitude into [-180, 180].
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 { 180.0 } else { wrapped }
}

/// TEME position (km) at `instant` to its geodetic subpoint.
pub fn subpoint(teme_pos: &Vector3<f64>, instant: &DateTime<Utc>) -> Geodetic {
    ecef_to_geodetic(&teme_to_ecef(teme_pos, instant))
}
