//! Flight geodesy.
//!
//! Everything here works on two consecutive `Position` reports and derives what the raw data
//! does not say directly: the great-circle bearing between them, the ground speed implied by
//! the distance covered and a rough bank angle for the observed heading change.
//!

use tracing::trace;

use crate::Position;

/// Earth radius in km
const EARTH_RADIUS_KM: f64 = 6_371.;

/// One nautical mile in km
const KM_PER_NM: f64 = 1.852;

/// Bank angles are kept within this limit, in degrees
const MAX_BANK: f64 = 60.;

/// Haversine distance in km between two reports.
///
pub fn distance_km(from: &Position, to: &Position) -> f64 {
    let (lat1, lat2) = (from.latitude.to_radians(), to.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Initial great-circle bearing from `from` to `to`, in degrees within `[0, 360)`.
///
pub fn bearing(from: &Position, to: &Position) -> f64 {
    let (lat1, lat2) = (from.latitude.to_radians(), to.latitude.to_radians());
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    let bearing = y.atan2(x).to_degrees();
    let bearing = if bearing < 0. { bearing + 360. } else { bearing };

    // -0.0 and rounding at the top end both land back in range
    let bearing = bearing % 360.;
    if bearing < 0. || bearing >= 360. {
        0.
    } else {
        bearing
    }
}

/// Average ground speed in knots needed to cover the distance between two reports.
///
/// Returns `None` when both reports share the same timestamp.
///
pub fn ground_speed_knots(from: &Position, to: &Position) -> Option<f64> {
    let hours = elapsed_secs(from, to)? / 3600.;
    let nm = distance_km(from, to) / KM_PER_NM;
    Some(nm / hours)
}

/// Estimate the bank angle a light aircraft would need to achieve the heading change observed
/// between two reports.
///
/// This is a loose heuristic: `((gs / 10) + 7) * turn_rate / 3`, clamped to +/- 60°.  Left
/// turns are negative.  Reports sharing the same timestamp give a level 0°.
///
pub fn bank_angle(from: &Position, to: &Position) -> f64 {
    let Some(dt) = elapsed_secs(from, to) else {
        return 0.;
    };

    let left = !is_right_turn(from.heading, to.heading);

    let mut delta = to.heading - from.heading;
    if left {
        delta = -delta;
    }
    if delta < 0. {
        delta += 360.;
    }
    if left {
        delta = -delta;
    }

    let turn_rate = delta / dt;
    let raw = ((from.groundspeed / 10.) + 7.) * turn_rate / 3.;
    let bank = raw.clamp(-MAX_BANK, MAX_BANK);

    trace!(
        "heading={} bank={} dt={}s dh={} turn_rate={} gs={}",
        from.heading,
        bank,
        dt,
        delta,
        turn_rate,
        from.groundspeed
    );
    bank
}

/// Going from `orig` to `dest`, do we turn right?  The shorter way round wins.
///
#[inline]
fn is_right_turn(orig: f64, dest: f64) -> bool {
    let wraps = (dest - orig).abs() > 180.;
    (dest > orig) != wraps
}

/// Seconds between two reports, `None` if there are none.
///
#[inline]
fn elapsed_secs(from: &Position, to: &Position) -> Option<f64> {
    let dt = (to.timestamp - from.timestamp).num_milliseconds() as f64 / 1000.;
    if dt == 0. {
        None
    } else {
        Some(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::rstest;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 11, 23, 27, 29).unwrap()
    }

    fn at(lat: f64, lon: f64, secs: i64) -> Position {
        Position {
            latitude: lat,
            longitude: lon,
            timestamp: t0() + Duration::seconds(secs),
            ..Default::default()
        }
    }

    fn turning(heading: f64, gs: f64, secs: i64) -> Position {
        Position {
            heading,
            groundspeed: gs,
            timestamp: t0() + Duration::seconds(secs),
            ..Default::default()
        }
    }

    #[test]
    fn test_ground_speed() {
        let from = at(37.65633, -122.09545, 0);
        let to = at(37.65244, -122.09936, 16);

        let gs = ground_speed_knots(&from, &to).unwrap();
        assert!((gs - 67.159).abs() < 0.001, "gs={gs}");
    }

    #[test]
    fn test_ground_speed_same_time() {
        let from = at(37.65633, -122.09545, 0);
        let to = at(37.65244, -122.09936, 0);

        assert!(ground_speed_knots(&from, &to).is_none());
    }

    #[test]
    fn test_bearing() {
        let from = at(37.65633, -122.09545, 0);
        let to = at(37.65244, -122.09936, 16);

        let b = bearing(&from, &to);
        assert!((b - 218.5133).abs() < 0.01, "bearing={b}");
    }

    #[rstest]
    #[case(0., 0., 1., 0.)]
    #[case(0., 0., 0., 1.)]
    #[case(0., 0., -1., 0.)]
    #[case(0., 0., 0., -1.)]
    #[case(10., 10., 10., 10.)]
    #[case(-33.9, 151.2, 51.5, -0.1)]
    #[case(89.9, 0., 89.9, 180.)]
    fn test_bearing_in_range(
        #[case] lat1: f64,
        #[case] lon1: f64,
        #[case] lat2: f64,
        #[case] lon2: f64,
    ) {
        let b = bearing(&at(lat1, lon1, 0), &at(lat2, lon2, 10));
        assert!((0. ..360.).contains(&b), "bearing={b}");
    }

    #[rstest]
    #[case(0., 0., 1., 0., 0.)]
    #[case(0., 0., 0., 1., 90.)]
    #[case(0., 0., -1., 0., 180.)]
    #[case(0., 0., 0., -1., 270.)]
    fn test_bearing_cardinal(
        #[case] lat1: f64,
        #[case] lon1: f64,
        #[case] lat2: f64,
        #[case] lon2: f64,
        #[case] expected: f64,
    ) {
        let b = bearing(&at(lat1, lon1, 0), &at(lat2, lon2, 10));
        assert!((b - expected).abs() < 1e-9, "bearing={b}");
    }

    #[rstest]
    #[case(270., 271., 65., 96, 0.046875)]
    #[case(271., 177., 62., 96, -4.308333)]
    #[case(350., 10., 100., 10, 11.333333)]
    #[case(10., 350., 100., 10, -11.333333)]
    #[case(90., 90., 100., 10, 0.)]
    fn test_bank_angle(
        #[case] h1: f64,
        #[case] h2: f64,
        #[case] gs: f64,
        #[case] dt: i64,
        #[case] expected: f64,
    ) {
        let bank = bank_angle(&turning(h1, gs, 0), &turning(h2, gs, dt));
        assert!((bank - expected).abs() < 1e-5, "bank={bank}");
    }

    #[rstest]
    #[case(0., 179., 1)]
    #[case(179., 0., 1)]
    #[case(0., 90., 1)]
    #[case(359., 1., 1)]
    #[case(1., 359., 1)]
    fn test_bank_angle_clamped(#[case] h1: f64, #[case] h2: f64, #[case] dt: i64) {
        let bank = bank_angle(&turning(h1, 500., 0), &turning(h2, 500., dt));
        assert!((-60. ..=60.).contains(&bank), "bank={bank}");
    }

    #[test]
    fn test_bank_angle_hard_turns_saturate() {
        let right = bank_angle(&turning(0., 500., 0), &turning(90., 500., 1));
        let left = bank_angle(&turning(90., 500., 0), &turning(0., 500., 1));
        assert_eq!(60., right);
        assert_eq!(-60., left);
    }

    #[test]
    fn test_bank_angle_same_time() {
        assert_eq!(0., bank_angle(&turning(0., 100., 0), &turning(90., 100., 0)));
    }

    #[rstest]
    #[case(10., 20., true)]
    #[case(20., 10., false)]
    #[case(350., 10., true)]
    #[case(10., 350., false)]
    fn test_is_right_turn(#[case] orig: f64, #[case] dest: f64, #[case] right: bool) {
        assert_eq!(right, is_right_turn(orig, dest));
    }
}
