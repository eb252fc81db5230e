// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::layout::{SlotBoundaries, SLOT_COUNT};
use crate::error::DrumError;

/// Number of entries in the envelope, effect and LFO parameter arrays.
pub const PARAM_COUNT: usize = 8;

/// Volume value the device treats as unity gain.
pub const VOLUME_FLAT: u16 = 0x2000;

/// Pitch value that leaves a slot untransposed.
pub const PITCH_CENTER: i16 = 0;

const DRUM_VERSION: u32 = 1;
const PATCH_TYPE: &str = "drum";
const PATCH_NAME: &str = "user";
const OCTAVE: i32 = 0;

const DEFAULT_ENVELOPE: [i32; PARAM_COUNT] = [0, 8192, 0, 8192, 0, 0, 0, 0];
const DEFAULT_FX_PARAMS: [i32; PARAM_COUNT] = [8000; PARAM_COUNT];
const DEFAULT_LFO_PARAMS: [i32; PARAM_COUNT] = [16000, 16000, 16000, 16000, 0, 0, 0, 0];

/// The effect assigned to the patch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FxType {
    #[default]
    Cwo,
    Delay,
    Grid,
    Nitro,
    Phone,
    Punch,
    Spring,
}

impl FxType {
    pub const ALL: [FxType; 7] = [
        FxType::Cwo,
        FxType::Delay,
        FxType::Grid,
        FxType::Nitro,
        FxType::Phone,
        FxType::Punch,
        FxType::Spring,
    ];

    /// Name of the effect as the device spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            FxType::Cwo => "cwo",
            FxType::Delay => "delay",
            FxType::Grid => "grid",
            FxType::Nitro => "nitro",
            FxType::Phone => "phone",
            FxType::Punch => "punch",
            FxType::Spring => "spring",
        }
    }
}

impl FromStr for FxType {
    type Err = DrumError;

    fn from_str(s: &str) -> Result<Self, DrumError> {
        FxType::ALL
            .into_iter()
            .find(|fx| fx.as_str() == s)
            .ok_or_else(|| unknown_name("effect type", s, FxType::ALL.map(FxType::as_str)))
    }
}

impl fmt::Display for FxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The LFO assigned to the patch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LfoType {
    Bend,
    Crank,
    #[default]
    Element,
    Midi,
    Random,
    Tremolo,
    Value,
}

impl LfoType {
    pub const ALL: [LfoType; 7] = [
        LfoType::Bend,
        LfoType::Crank,
        LfoType::Element,
        LfoType::Midi,
        LfoType::Random,
        LfoType::Tremolo,
        LfoType::Value,
    ];

    /// Name of the LFO as the device spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            LfoType::Bend => "bend",
            LfoType::Crank => "crank",
            LfoType::Element => "element",
            LfoType::Midi => "midi",
            LfoType::Random => "random",
            LfoType::Tremolo => "tremolo",
            LfoType::Value => "value",
        }
    }
}

impl FromStr for LfoType {
    type Err = DrumError;

    fn from_str(s: &str) -> Result<Self, DrumError> {
        LfoType::ALL
            .into_iter()
            .find(|lfo| lfo.as_str() == s)
            .ok_or_else(|| unknown_name("LFO type", s, LfoType::ALL.map(LfoType::as_str)))
    }
}

impl fmt::Display for LfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn unknown_name(kind: &str, value: &str, valid: [&str; 7]) -> DrumError {
    DrumError::Argument(format!(
        "unknown {} '{}', expected one of: {}",
        kind,
        value,
        valid.join(", ")
    ))
}

/// How a slot plays when triggered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    Forward,
    #[default]
    OneShot,
    Loop,
}

impl PlayMode {
    /// The device encoding of this play mode.
    pub fn code(self) -> u16 {
        match self {
            PlayMode::Forward => 0x1000,
            PlayMode::OneShot => 0x2000,
            PlayMode::Loop => 0x4800,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x1000 => Some(PlayMode::Forward),
            0x2000 => Some(PlayMode::OneShot),
            0x4800 => Some(PlayMode::Loop),
            _ => None,
        }
    }
}

/// Playback direction of a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// The device encoding of this direction.
    pub fn code(self) -> u16 {
        match self {
            Direction::Forward => 0x2000,
            Direction::Reverse => 0x4800,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x2000 => Some(Direction::Forward),
            0x4800 => Some(Direction::Reverse),
            _ => None,
        }
    }
}

/// Per-slot parameters, one entry per drum slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrumSlotParams {
    pub start_time: [u32; SLOT_COUNT],
    pub end_time: [u32; SLOT_COUNT],
    pub pitch: [i16; SLOT_COUNT],
    pub volume: [u16; SLOT_COUNT],
    pub playmode: [PlayMode; SLOT_COUNT],
    pub playback_direction: [Direction; SLOT_COUNT],
}

impl Default for DrumSlotParams {
    fn default() -> Self {
        DrumSlotParams {
            start_time: [0; SLOT_COUNT],
            end_time: [0; SLOT_COUNT],
            pitch: [PITCH_CENTER; SLOT_COUNT],
            volume: [VOLUME_FLAT; SLOT_COUNT],
            playmode: [PlayMode::default(); SLOT_COUNT],
            playback_direction: [Direction::default(); SLOT_COUNT],
        }
    }
}

/// Every parameter of a drum patch. Serialized into the container's
/// application chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchDescriptor {
    drum_slots: DrumSlotParams,
    envelope: [i32; PARAM_COUNT],
    fx_type: FxType,
    fx_active: bool,
    fx_params: [i32; PARAM_COUNT],
    lfo_type: LfoType,
    lfo_active: bool,
    lfo_params: [i32; PARAM_COUNT],
}

impl Default for PatchDescriptor {
    fn default() -> Self {
        PatchDescriptor {
            drum_slots: DrumSlotParams::default(),
            envelope: DEFAULT_ENVELOPE,
            fx_type: FxType::default(),
            fx_active: false,
            fx_params: DEFAULT_FX_PARAMS,
            lfo_type: LfoType::default(),
            lfo_active: false,
            lfo_params: DEFAULT_LFO_PARAMS,
        }
    }
}

/// The JSON layout the device reads. Field order is the serialization order.
#[derive(Serialize, Deserialize)]
struct DescriptorJson {
    drum_version: u32,
    #[serde(rename = "type")]
    patch_type: String,
    name: String,
    octave: i32,
    pitch: [i16; SLOT_COUNT],
    start: [u32; SLOT_COUNT],
    end: [u32; SLOT_COUNT],
    playmode: [u16; SLOT_COUNT],
    reverse: [u16; SLOT_COUNT],
    volume: [u16; SLOT_COUNT],
    dyna_env: [i32; PARAM_COUNT],
    fx_active: bool,
    fx_type: String,
    fx_params: [i32; PARAM_COUNT],
    lfo_active: bool,
    lfo_type: String,
    lfo_params: [i32; PARAM_COUNT],
}

impl PatchDescriptor {
    /// Creates a descriptor with default parameters and the named effect and LFO.
    pub fn with_effects(fx_type: &str, lfo_type: &str) -> Result<Self, DrumError> {
        Ok(PatchDescriptor {
            fx_type: fx_type.parse()?,
            lfo_type: lfo_type.parse()?,
            ..Default::default()
        })
    }

    pub fn drum_slots(&self) -> &DrumSlotParams {
        &self.drum_slots
    }

    pub fn envelope(&self) -> &[i32; PARAM_COUNT] {
        &self.envelope
    }

    pub fn fx_type(&self) -> FxType {
        self.fx_type
    }

    pub fn fx_active(&self) -> bool {
        self.fx_active
    }

    pub fn fx_params(&self) -> &[i32; PARAM_COUNT] {
        &self.fx_params
    }

    pub fn lfo_type(&self) -> LfoType {
        self.lfo_type
    }

    pub fn lfo_active(&self) -> bool {
        self.lfo_active
    }

    pub fn lfo_params(&self) -> &[i32; PARAM_COUNT] {
        &self.lfo_params
    }

    pub fn set_fx_type(&mut self, fx_type: FxType) {
        self.fx_type = fx_type;
    }

    pub fn set_fx_active(&mut self, active: bool) {
        self.fx_active = active;
    }

    pub fn set_fx_params(&mut self, params: [i32; PARAM_COUNT]) {
        self.fx_params = params;
    }

    pub fn set_lfo_type(&mut self, lfo_type: LfoType) {
        self.lfo_type = lfo_type;
    }

    pub fn set_lfo_active(&mut self, active: bool) {
        self.lfo_active = active;
    }

    pub fn set_lfo_params(&mut self, params: [i32; PARAM_COUNT]) {
        self.lfo_params = params;
    }

    pub fn set_envelope(&mut self, envelope: [i32; PARAM_COUNT]) {
        self.envelope = envelope;
    }

    pub fn set_pitches(&mut self, pitches: [i16; SLOT_COUNT]) {
        self.drum_slots.pitch = pitches;
    }

    pub fn set_volumes(&mut self, volumes: [u16; SLOT_COUNT]) {
        self.drum_slots.volume = volumes;
    }

    pub fn set_playmodes(&mut self, playmodes: [PlayMode; SLOT_COUNT]) {
        self.drum_slots.playmode = playmodes;
    }

    pub fn set_playback_directions(&mut self, directions: [Direction; SLOT_COUNT]) {
        self.drum_slots.playback_direction = directions;
    }

    /// Sets the parameters of a single slot.
    pub fn set_slot(
        &mut self,
        slot: usize,
        pitch: i16,
        volume: u16,
        playmode: PlayMode,
        direction: Direction,
    ) -> Result<(), DrumError> {
        if slot >= SLOT_COUNT {
            return Err(DrumError::Argument(format!(
                "slot {} out of range, a drum patch has {} slots",
                slot, SLOT_COUNT
            )));
        }
        self.drum_slots.pitch[slot] = pitch;
        self.drum_slots.volume[slot] = volume;
        self.drum_slots.playmode[slot] = playmode;
        self.drum_slots.playback_direction[slot] = direction;
        Ok(())
    }

    /// Stores the slot boundaries, in device time units.
    pub fn set_boundaries(&mut self, boundaries: SlotBoundaries) {
        self.drum_slots.start_time = boundaries.start;
        self.drum_slots.end_time = boundaries.end;
    }

    /// Serializes the descriptor to the compact JSON the device reads.
    pub fn to_json(&self) -> Result<String, DrumError> {
        let slots = &self.drum_slots;
        let json = DescriptorJson {
            drum_version: DRUM_VERSION,
            patch_type: PATCH_TYPE.to_string(),
            name: PATCH_NAME.to_string(),
            octave: OCTAVE,
            pitch: slots.pitch,
            start: slots.start_time,
            end: slots.end_time,
            playmode: slots.playmode.map(PlayMode::code),
            reverse: slots.playback_direction.map(Direction::code),
            volume: slots.volume,
            dyna_env: self.envelope,
            fx_active: self.fx_active,
            fx_type: self.fx_type.as_str().to_string(),
            fx_params: self.fx_params,
            lfo_active: self.lfo_active,
            lfo_type: self.lfo_type.as_str().to_string(),
            lfo_params: self.lfo_params,
        };
        Ok(serde_json::to_string(&json)?)
    }

    /// Parses a descriptor previously produced by `to_json` (or by the device).
    pub fn from_json(json: &str) -> Result<Self, DrumError> {
        let parsed: DescriptorJson = serde_json::from_str(json)?;

        if parsed.patch_type != PATCH_TYPE {
            return Err(DrumError::Argument(format!(
                "not a drum patch: type is '{}'",
                parsed.patch_type
            )));
        }

        let mut playmode = [PlayMode::default(); SLOT_COUNT];
        for (slot, code) in parsed.playmode.iter().enumerate() {
            playmode[slot] = PlayMode::from_code(*code).ok_or_else(|| {
                DrumError::Argument(format!("unknown play mode {:#x} in slot {}", code, slot))
            })?;
        }
        let mut playback_direction = [Direction::default(); SLOT_COUNT];
        for (slot, code) in parsed.reverse.iter().enumerate() {
            playback_direction[slot] = Direction::from_code(*code).ok_or_else(|| {
                DrumError::Argument(format!("unknown direction {:#x} in slot {}", code, slot))
            })?;
        }

        Ok(PatchDescriptor {
            drum_slots: DrumSlotParams {
                start_time: parsed.start,
                end_time: parsed.end,
                pitch: parsed.pitch,
                volume: parsed.volume,
                playmode,
                playback_direction,
            },
            envelope: parsed.dyna_env,
            fx_type: parsed.fx_type.parse()?,
            fx_active: parsed.fx_active,
            fx_params: parsed.fx_params,
            lfo_type: parsed.lfo_type.parse()?,
            lfo_active: parsed.lfo_active,
            lfo_params: parsed.lfo_params,
        })
    }
}
