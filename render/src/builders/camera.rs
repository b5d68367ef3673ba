//! First-person view of the flight, as a `gx:Tour`.
//!
//! Every pair of consecutive reports becomes one `gx:FlyTo` lasting as long as the gap between
//! them.  The camera sits at the earlier report, a bit above the wheels, looking along the
//! heading and rolled by the estimated bank angle.
//!

use strum::{EnumString, VariantNames};
use tracing::{debug, trace};

use fviz_common::Options;
use fviz_formats::{bank_angle, Position};

use crate::elements::{leaf, node, when};
use crate::{Fragment, Layer, LayerBuilder, RenderError};

/// Height of the eyes above the wheels, in metres
const CAMERA_HEIGHT: f64 = 2.;

/// Looking slightly down at the horizon
const TILT: f64 = 80.;

/// How the camera altitude is interpreted.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, EnumString, strum::Display, VariantNames)]
#[strum(serialize_all = "camelCase")]
pub enum CameraAltitude {
    #[default]
    Absolute,
    RelativeToGround,
}

#[derive(Clone, Debug)]
pub struct CameraBuilder {
    /// Roll with the bank angle
    banking: bool,
    /// Report the roll of every frame
    debug: bool,
    altitude_mode: CameraAltitude,
}

impl CameraBuilder {
    pub fn new(opts: Options) -> Self {
        CameraBuilder {
            banking: opts.banking,
            debug: opts.debug,
            altitude_mode: CameraAltitude::default(),
        }
    }

    pub fn altitude_mode(mut self, mode: CameraAltitude) -> Self {
        self.altitude_mode = mode;
        self
    }
}

impl LayerBuilder for CameraBuilder {
    fn name(&self) -> &str {
        "camera"
    }

    #[tracing::instrument(skip_all)]
    fn build(&self, positions: &[Position]) -> Result<Fragment, RenderError> {
        let start = positions.first().map(|p| p.timestamp);

        let frames = positions
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let (this, next) = (&pair[0], &pair[1]);

                // 0 - bank keeps a level roll as "0" and not "-0"
                let roll = if self.banking {
                    0. - bank_angle(this, next)
                } else {
                    0.
                };
                let duration = (next.timestamp - this.timestamp).num_milliseconds() as f64 / 1000.;
                let mode = if i == 0 { "bounce" } else { "smooth" };
                if self.debug {
                    debug!(
                        "frame {i}: hdg={} -> {} gs={} roll={roll}",
                        this.heading, next.heading, this.groundspeed
                    );
                }
                trace!("frame {i}: {duration}s {mode}");

                let span = node(
                    "gx:TimeSpan",
                    vec![
                        leaf("begin", when(start.unwrap_or(this.timestamp))),
                        leaf("end", when(next.timestamp)),
                    ],
                );
                let camera = node(
                    "Camera",
                    vec![
                        span,
                        leaf("longitude", this.longitude),
                        leaf("latitude", this.latitude),
                        leaf("altitude", this.altitude_m() + CAMERA_HEIGHT),
                        leaf("heading", this.heading),
                        leaf("tilt", TILT),
                        leaf("roll", roll),
                        leaf("altitudeMode", self.altitude_mode),
                    ],
                );
                node(
                    "gx:FlyTo",
                    vec![
                        leaf("gx:duration", duration),
                        leaf("gx:flyToMode", mode),
                        camera,
                    ],
                )
            })
            .collect::<Vec<_>>();

        let tour = node(
            "gx:Tour",
            vec![
                leaf("name", "Camera View"),
                leaf("description", Layer::Camera.description()),
                node("gx:Playlist", frames),
            ],
        );
        Ok(Fragment::new(kml::Kml::Element(tour)))
    }
}
