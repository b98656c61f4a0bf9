mod dhv;
mod gga;
mod gll;
mod gsa;
mod gst;
mod gsv;
mod rmc;
mod txt;
mod vtg;
mod zda;

pub use dhv::DHV;
pub use gga::GGA;
pub use gll::GLL;
pub use gsa::GSA;
pub use gst::GST;
pub use gsv::{GSV, SatelliteTally};
pub use rmc::RMC;
pub use txt::TXT;
pub use vtg::VTG;
pub use zda::ZDA;

/// A closed set of values read from a single-token field.
///
/// Every implementor has a fallback member, [`FieldEnum::UNDEFINED`], used for
/// empty or unknown tokens, and a stable one-byte code for the wire format.
pub trait FieldEnum: Sized + Copy {
    /// The member used when a field is empty or carries an unknown token.
    const UNDEFINED: Self;

    /// Maps an NMEA token to a member. Unknown tokens give `None`.
    fn from_token(token: &str) -> Option<Self>;

    /// Stable wire code.
    fn code(self) -> u8;

    /// Inverse of [`FieldEnum::code`].
    fn from_code(code: u8) -> Option<Self>;
}

macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $token:literal => $variant:ident = $code:literal
            ),* $(,)?
        }
        $(#[$fallback_meta:meta])*
        _ => $fallback:ident = $fallback_code:literal
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            $(#[$fallback_meta])*
            $fallback,
        }

        impl FieldEnum for $name {
            const UNDEFINED: Self = Self::$fallback;

            fn from_token(token: &str) -> Option<Self> {
                match token {
                    $($token => Some(Self::$variant),)*
                    _ => None,
                }
            }

            fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code,)*
                    Self::$fallback => $fallback_code,
                }
            }

            fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)*
                    $fallback_code => Some(Self::$fallback),
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$fallback
            }
        }
    };
}

field_enum! {
    /// How the RMC position was obtained.
    pub enum CoordinateDefinition {
        /// A - Autonomous
        "A" => Autonomous = 1,
        /// D - Differential
        "D" => Differential = 2,
        /// E - Approximation (dead reckoning)
        "E" => Approximation = 3,
        /// M - Fixed (manual input)
        "M" => Fixed = 4,
        /// N - Data not valid
        "N" => NotValid = 5,
    }
    /// Field missing or unknown
    _ => Invalid = 0
}

field_enum! {
    /// Quality of the GGA fix
    pub enum FixQuality {
        /// 0 - Fix not available
        "0" => Unavailable = 0,
        /// 1 - Autonomous GNSS fix
        "1" => Autonomous = 1,
        /// 2 - Differential fix
        "2" => Differential = 2,
        /// 3 - PPS fix
        "3" => Pps = 3,
        /// 4 - Real Time Kinematic, fixed integers
        "4" => FixedRtk = 4,
        /// 5 - Real Time Kinematic, float
        "5" => FloatRtk = 5,
        /// 6 - Estimated (dead reckoning)
        "6" => Estimated = 6,
        /// 7 - Manual input
        "7" => Manual = 7,
        /// 8 - Simulation
        "8" => Simulation = 8,
    }
    _ => Invalid = 255
}

field_enum! {
    /// Unit of an altitude or separation
    pub enum DistanceUnit {
        /// M - Meters
        "M" => Meters = 1,
        /// F - Feet
        "F" => Feet = 2,
    }
    _ => Undefined = 0
}

field_enum! {
    /// GSA selection mode
    pub enum SelectionMode {
        /// A - Automatic, 2D/3D
        "A" => Automatic = 1,
        /// M - Manual, forced to operate in 2D or 3D
        "M" => Manual = 2,
    }
    _ => Undefined = 0
}

field_enum! {
    /// GSA fix mode
    pub enum FixMode {
        /// 0 - Not reported
        "0" => NotAvailable = 0,
        /// 1 - No fix
        "1" => NoFix = 1,
        /// 2 - 2D Fix
        "2" => Fix2D = 2,
        /// 3 - 3D Fix
        "3" => Fix3D = 3,
    }
    _ => Undefined = 255
}

field_enum! {
    /// GNSS system id (NMEA 4.11)
    pub enum GnssSystem {
        /// 1 - GPS
        "1" => Gps = 1,
        /// 2 - GLONASS
        "2" => Glonass = 2,
        /// 3 - Galileo
        "3" => Galileo = 3,
        /// 4 - BeiDou
        "4" => Beidou = 4,
    }
    _ => Undefined = 0
}

field_enum! {
    /// Positioning mode indicator used by GLL and VTG
    pub enum ModeIndicator {
        /// A - Autonomous
        "A" => Autonomous = 1,
        /// D - Differential
        "D" => Differential = 2,
        /// E - Estimated (dead reckoning)
        "E" => Estimated = 3,
        /// M - Manual input
        "M" => Manual = 4,
        /// N - Data not valid
        "N" => NotValid = 5,
        /// S - Simulator
        "S" => Simulator = 6,
    }
    _ => Undefined = 0
}

impl ModeIndicator {
    /// Autonomous and differential fixes are the ones worth navigating on.
    pub fn is_valid(self) -> bool {
        matches!(self, ModeIndicator::Autonomous | ModeIndicator::Differential)
    }
}

/// Satellite information carried by [`GSV`] sentences.
///
/// Every value but the PRN may be missing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Satellite {
    pub prn: u8,
    /// Elevation in degrees, `[0, 90]`
    pub elevation: Option<f64>,
    /// Azimuth in degrees, `[0, 360)`
    pub azimuth: Option<f64>,
    /// Signal to noise ratio in dB-Hz, `[0, 99]`
    pub snr: Option<f64>,
}
