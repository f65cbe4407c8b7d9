/// Mean Earth radius used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: Point, b: Point) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sort items ascending by their distance to `origin`, returning each with its distance.
pub fn sort_by_distance<T, F>(items: Vec<T>, origin: Point, position: F) -> Vec<(T, f64)>
where
    F: Fn(&T) -> Point,
{
    let mut with_distance: Vec<(T, f64)> = items
        .into_iter()
        .map(|item| {
            let distance = haversine_km(origin, position(&item));
            (item, distance)
        })
        .collect();
    with_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

    with_distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = Point::new(52.2297, 21.0122);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_warsaw_krakow() {
        let warsaw = Point::new(52.2297, 21.0122);
        let krakow = Point::new(50.0647, 19.9450);
        let d = haversine_km(warsaw, krakow);
        // roughly 252 km as the crow flies
        assert!((d - 252.0).abs() < 2.0, "{d}");
        assert!((haversine_km(krakow, warsaw) - d).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_km(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_sort_by_distance_is_monotonic() {
        let origin = Point::new(52.0, 21.0);
        let points = vec![
            Point::new(54.35, 18.65),
            Point::new(52.01, 21.01),
            Point::new(50.06, 19.94),
            Point::new(52.0, 21.0),
            Point::new(51.1, 17.03),
        ];
        let sorted = sort_by_distance(points, origin, |p| *p);

        assert_eq!(sorted.len(), 5);
        assert_eq!(sorted[0].0, origin);
        for pair in sorted.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }
}
