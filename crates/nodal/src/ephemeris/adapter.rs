use crate::ephemeris::julian::JulianDay;
use crate::ephemeris::provider::{EphemerisError, EphemerisProvider};
use crate::ephemeris::types::{normalize_degrees, Body, GeoCoordinate, HouseCusps, HouseSystem};
use lazy_static::lazy_static;
use log::{debug, info};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use swisseph::swe::{calc_ut, houses_ex, set_ephe_path};
use swisseph::{AscMc, Cusp};

/// FLG_SWIEPH: read the Swiss Ephemeris data files
const FLG_SWIEPH: i32 = 2;

/// Default location of the data files when neither configuration nor
/// `SWISS_EPHEMERIS_PATH` names one.
pub const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

lazy_static! {
    // The C library keeps open file handles and caches in process globals,
    // shared by every adapter instance.
    static ref SWISSEPH_LOCK: Mutex<()> = Mutex::new(());
}

fn swisseph_lock() -> MutexGuard<'static, ()> {
    // A panic inside a previous call leaves no state we depend on.
    SWISSEPH_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Swiss Ephemeris backed [`EphemerisProvider`].
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter. The data path is startup configuration: pass it
    /// explicitly, or `None` to fall back to `SWISS_EPHEMERIS_PATH` and then
    /// [`DEFAULT_EPHEMERIS_PATH`].
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        {
            let _held = swisseph_lock();
            set_ephe_path(&path.to_string_lossy());
        }
        info!("Swiss Ephemeris data path: {}", path.display());

        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn longitude_of(&self, body: Body, jd: JulianDay) -> Result<f64, EphemerisError> {
        let result = {
            let _held = swisseph_lock();
            calc_ut(jd.value(), body.swiss_id() as u32, FLG_SWIEPH as u32)
        }
        .map_err(|e| EphemerisError::CalculationFailed {
            body: body.name().to_string(),
            julian_day: jd,
            message: format!("Swiss Ephemeris error: {}", e),
        })?;

        let longitude = result.out[0];
        if !longitude.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body: body.name().to_string(),
                julian_day: jd,
                message: format!("non-finite longitude {}", longitude),
            });
        }

        let lon = normalize_degrees(longitude);
        debug!("{} at {}: {:.6}", body.name(), jd, lon);
        Ok(lon)
    }

    fn house_cusps(
        &self,
        jd: JulianDay,
        location: &GeoCoordinate,
        system: HouseSystem,
    ) -> Result<HouseCusps, EphemerisError> {
        let (c, a) = {
            let _held = swisseph_lock();
            houses_ex(
                jd.value(),
                FLG_SWIEPH,
                location.lat(),
                location.lon(),
                system.code() as i32,
            )
        };

        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        if !ascmc.ascendant.is_finite() || !ascmc.mc.is_finite() {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!(
                    "{} houses at {} for {} produced no ascendant",
                    system.name(),
                    jd,
                    location
                ),
            });
        }

        // Degenerate cusps are passed through; house assignment leaves the
        // house undefined rather than guessing.
        let cusp_values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        let cusps = cusp_values
            .iter()
            .map(|&c| if c.is_finite() { normalize_degrees(c) } else { c })
            .collect();

        Ok(HouseCusps {
            system,
            cusps,
            ascendant: normalize_degrees(ascmc.ascendant),
            midheaven: normalize_degrees(ascmc.mc),
        })
    }
}
