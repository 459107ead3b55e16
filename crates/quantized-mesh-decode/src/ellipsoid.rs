//! Geographic to cartesian projection.
//!
//! The decoder only needs one capability from geodesy: turn a
//! `(longitude, latitude, height)` triple into an earth-fixed cartesian
//! position. That capability is the [`Projector`] trait; [`Ellipsoid`] is the
//! standard implementation.

use glam::DVec3;

/// Geographic position. Angles in radians, height in world units above the
/// reference surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Cartographic {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }
}

/// Converts geographic positions to cartesian positions.
///
/// Implementations must be pure: the same input always gives the same output.
pub trait Projector {
    fn cartographic_to_cartesian(&self, cartographic: Cartographic) -> DVec3;
}

/// A reference ellipsoid centered at the origin, aligned with the axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    radii: DVec3,
    radii_squared: DVec3,
}

impl Ellipsoid {
    /// WGS84 ellipsoid, in meters.
    pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 6_378_137.0, 6_356_752.314_245_179);

    /// Sphere of radius 1.
    pub const UNIT_SPHERE: Ellipsoid = Ellipsoid::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            radii: DVec3::new(x, y, z),
            radii_squared: DVec3::new(x * x, y * y, z * z),
        }
    }

    #[must_use]
    pub fn radii(&self) -> DVec3 {
        self.radii
    }

    #[must_use]
    pub fn maximum_radius(&self) -> f64 {
        self.radii.max_element()
    }

    /// Unit normal to the ellipsoid surface at a geographic position.
    #[must_use]
    pub fn geodetic_surface_normal(&self, longitude: f64, latitude: f64) -> DVec3 {
        let cos_latitude = latitude.cos();
        DVec3::new(
            cos_latitude * longitude.cos(),
            cos_latitude * longitude.sin(),
            latitude.sin(),
        )
        .normalize()
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl Projector for Ellipsoid {
    fn cartographic_to_cartesian(&self, cartographic: Cartographic) -> DVec3 {
        let normal = self.geodetic_surface_normal(cartographic.longitude, cartographic.latitude);
        let k = self.radii_squared * normal;
        let gamma = normal.dot(k).sqrt();
        k / gamma + normal * cartographic.height
    }
}

impl<P: Projector + ?Sized> Projector for &P {
    fn cartographic_to_cartesian(&self, cartographic: Cartographic) -> DVec3 {
        (**self).cartographic_to_cartesian(cartographic)
    }
}
