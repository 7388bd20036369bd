//! Cálculo de distancia geodésica
//!
//! Este módulo implementa la distancia inversa sobre el elipsoide WGS84
//! (fórmula de Vincenty) usada por la búsqueda de transportes por radio.

/// Semieje mayor WGS84 en metros
const WGS84_A: f64 = 6_378_137.0;
/// Achatamiento WGS84
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// Radio medio terrestre en metros, para el fallback haversine
const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

const MAX_ITERATIONS: usize = 100;
const CONVERGENCE: f64 = 1e-12;

/// Distancia geodésica en metros entre dos puntos (lat, long) en grados.
///
/// Itera la fórmula inversa de Vincenty sobre WGS84; para pares casi
/// antipodales donde la iteración no converge cae a haversine.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let b = WGS84_A * (1.0 - WGS84_F);

    let u1 = ((1.0 - WGS84_F) * lat1.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * lat2.to_radians().tan()).atan();
    let l = (lon2 - lon1).to_radians();

    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // puntos coincidentes
            return 0.0;
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            // ambos puntos sobre el ecuador
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < CONVERGENCE {
            let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - b * b) / (b * b);
            let a_coef = 1.0
                + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let b_coef = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

            let delta_sigma = b_coef
                * sin_sigma
                * (cos_2sigma_m
                    + b_coef / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - b_coef / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

            return b * a_coef * (sigma - delta_sigma);
        }
    }

    haversine_meters(lat1, lon1, lat2, lon2)
}

/// El punto cae dentro del radio desde el centro.
///
/// Corte inclusivo: un punto exactamente a `radius_meters` entra. Con
/// radio cero solo pasan los puntos coincidentes.
pub fn within_radius(
    center_lat: f64,
    center_lon: f64,
    lat: f64,
    lon: f64,
    radius_meters: f64,
) -> bool {
    distance_meters(center_lat, center_lon, lat, lon) <= radius_meters
}

/// Distancia por gran círculo sobre esfera de radio medio terrestre.
fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_MEAN_RADIUS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coincident_points() {
        assert_eq!(distance_meters(54.32, 48.39, 54.32, 48.39), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude_at_equator() {
        // arco de meridiano de 1 grado en el ecuador WGS84: ~110574.4 m
        let d = distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((d - 110_574.4).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        // arco ecuatorial de 1 grado WGS84: ~111319.5 m
        let d = distance_meters(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_319.5).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn test_symmetry() {
        let d1 = distance_meters(54.32, 48.39, 55.75, 37.62);
        let d2 = distance_meters(55.75, 37.62, 54.32, 48.39);
        assert!((d1 - d2).abs() < 1e-6);
    }

    #[test]
    fn test_short_distance_is_small() {
        // ~11 metros por 0.0001 grados de latitud
        let d = distance_meters(54.3200, 48.3900, 54.3201, 48.3900);
        assert!(d > 5.0 && d < 20.0, "got {}", d);
    }

    #[test]
    fn test_within_radius_boundary_is_inclusive() {
        let (c_lat, c_lon) = (54.32, 48.39);
        let (p_lat, p_lon) = (54.33, 48.40);
        let exact = distance_meters(c_lat, c_lon, p_lat, p_lon);

        // un punto exactamente a R metros entra; a R - ε queda fuera
        assert!(within_radius(c_lat, c_lon, p_lat, p_lon, exact));
        assert!(!within_radius(c_lat, c_lon, p_lat, p_lon, exact - 0.01));
        assert!(within_radius(c_lat, c_lon, p_lat, p_lon, exact + 0.01));
    }

    #[test]
    fn test_within_radius_zero_matches_coincidence_only() {
        assert!(within_radius(54.32, 48.39, 54.32, 48.39, 0.0));
        assert!(!within_radius(54.32, 48.39, 54.3201, 48.39, 0.0));
    }

    #[test]
    fn test_haversine_fallback_close_to_vincenty() {
        let v = distance_meters(10.0, 20.0, 11.0, 21.0);
        let h = haversine_meters(10.0, 20.0, 11.0, 21.0);
        // la esfera media difiere del elipsoide en menos de 0.6%
        assert!((v - h).abs() / v < 0.006, "vincenty {} haversine {}", v, h);
    }
}
