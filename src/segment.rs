///! Per-segment route rendering record consumed by the description stage
///!
///! Shape-only data carrier. This crate only pins down the record layout the
///! geometry unpacker fills in downstream; turn classification and the
///! `necessary` marking logic live with the consumer.

use crate::ids::NodeId;

/// Turn instruction code; 0 means "no turn".
pub type TurnInstruction = u8;

pub const TURN_NONE: TurnInstruction = 0;

/// One node of a rendered route.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentInformation {
    /// Fixed-point latitude, 1e-7 degrees.
    pub lat_fxp: i32,
    /// Fixed-point longitude, 1e-7 degrees.
    pub lon_fxp: i32,
    pub name_id: NodeId,
    pub duration: u32,
    pub length: f64,
    /// Tenths of a degree, 0..=3599.
    pub bearing: u16,
    pub turn_instruction: TurnInstruction,
    pub necessary: bool,
}

impl SegmentInformation {
    pub fn new(
        lat_fxp: i32,
        lon_fxp: i32,
        name_id: NodeId,
        duration: u32,
        length: f64,
        turn_instruction: TurnInstruction,
        necessary: bool,
    ) -> Self {
        SegmentInformation {
            lat_fxp,
            lon_fxp,
            name_id,
            duration,
            length,
            bearing: 0,
            turn_instruction,
            necessary,
        }
    }

    /// Segments carrying a turn instruction are always necessary.
    pub fn with_turn(
        lat_fxp: i32,
        lon_fxp: i32,
        name_id: NodeId,
        duration: u32,
        length: f64,
        turn_instruction: TurnInstruction,
    ) -> Self {
        SegmentInformation {
            lat_fxp,
            lon_fxp,
            name_id,
            duration,
            length,
            bearing: 0,
            turn_instruction,
            necessary: turn_instruction != TURN_NONE,
        }
    }
}
