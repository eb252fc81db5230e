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
use std::path::Path;

use config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use super::error::ConfigError;
use crate::drum::{
    Direction, FxType, LfoType, PatchDescriptor, PlayMode, SlotLayout, PARAM_COUNT, PITCH_CENTER,
    SLOT_COUNT, VOLUME_FLAT,
};
use crate::error::DrumError;

/// A kit file: every descriptor parameter the command line doesn't expose.
/// Anything left out keeps its default.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitConfig {
    fx_type: Option<FxType>,
    fx_active: Option<bool>,
    fx_params: Option<Vec<i32>>,
    lfo_type: Option<LfoType>,
    lfo_active: Option<bool>,
    lfo_params: Option<Vec<i32>>,
    envelope: Option<Vec<i32>>,

    /// Per-slot parameters, in slot order.
    #[serde(default)]
    slots: Vec<KitSlot>,

    /// Explicit slot boundaries in frames.
    layout: Option<KitLayout>,
}

/// Parameters of a single slot.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitSlot {
    #[serde(default = "default_pitch")]
    pitch: i16,
    #[serde(default = "default_volume")]
    volume: u16,
    #[serde(default)]
    playmode: PlayMode,
    #[serde(default)]
    direction: Direction,
}

fn default_pitch() -> i16 {
    PITCH_CENTER
}

fn default_volume() -> u16 {
    VOLUME_FLAT
}

/// Explicit slot boundaries, one start and end frame per slot.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitLayout {
    start: Vec<u32>,
    end: Vec<u32>,
}

impl KitConfig {
    /// Loads a kit file. The format follows the file extension.
    pub fn load(path: &Path) -> Result<KitConfig, ConfigError> {
        let kit = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<KitConfig>()?;
        kit.validate()?;
        debug!(path = ?path, slots = kit.slots.len(), "Loaded kit");
        Ok(kit)
    }

    /// Parses a kit from a string in the given format.
    pub fn parse(text: &str, format: FileFormat) -> Result<KitConfig, ConfigError> {
        let kit = Config::builder()
            .add_source(File::from_str(text, format))
            .build()?
            .try_deserialize::<KitConfig>()?;
        kit.validate()?;
        Ok(kit)
    }

    /// Checks array lengths and the slot count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.len() > SLOT_COUNT {
            return Err(ConfigError::Invalid(format!(
                "{} slots given, a drum patch has {}",
                self.slots.len(),
                SLOT_COUNT
            )));
        }
        for (name, values) in [
            ("fx_params", &self.fx_params),
            ("lfo_params", &self.lfo_params),
            ("envelope", &self.envelope),
        ] {
            if let Some(values) = values {
                to_array::<i32, PARAM_COUNT>(name, values)?;
            }
        }
        if let Some(layout) = &self.layout {
            to_array::<u32, SLOT_COUNT>("layout.start", &layout.start)?;
            to_array::<u32, SLOT_COUNT>("layout.end", &layout.end)?;
        }
        Ok(())
    }

    pub fn fx_type(&self) -> Option<FxType> {
        self.fx_type
    }

    pub fn lfo_type(&self) -> Option<LfoType> {
        self.lfo_type
    }

    pub fn slots(&self) -> &[KitSlot] {
        &self.slots
    }

    /// Copies every parameter the kit sets onto the descriptor.
    pub fn apply(&self, descriptor: &mut PatchDescriptor) -> Result<(), DrumError> {
        if let Some(fx_type) = self.fx_type {
            descriptor.set_fx_type(fx_type);
        }
        if let Some(active) = self.fx_active {
            descriptor.set_fx_active(active);
        }
        if let Some(params) = &self.fx_params {
            descriptor.set_fx_params(to_array("fx_params", params)?);
        }
        if let Some(lfo_type) = self.lfo_type {
            descriptor.set_lfo_type(lfo_type);
        }
        if let Some(active) = self.lfo_active {
            descriptor.set_lfo_active(active);
        }
        if let Some(params) = &self.lfo_params {
            descriptor.set_lfo_params(to_array("lfo_params", params)?);
        }
        if let Some(envelope) = &self.envelope {
            descriptor.set_envelope(to_array("envelope", envelope)?);
        }

        for (index, slot) in self.slots.iter().enumerate() {
            descriptor.set_slot(
                index,
                slot.pitch,
                slot.volume,
                slot.playmode,
                slot.direction,
            )?;
        }
        Ok(())
    }

    /// The slot layout the kit asks for. Automatic unless it lists boundaries.
    pub fn layout(&self) -> Result<SlotLayout, DrumError> {
        match &self.layout {
            None => Ok(SlotLayout::Auto),
            Some(layout) => Ok(SlotLayout::Explicit {
                start: to_array("layout.start", &layout.start)?,
                end: to_array("layout.end", &layout.end)?,
            }),
        }
    }
}

impl KitSlot {
    pub fn pitch(&self) -> i16 {
        self.pitch
    }

    pub fn volume(&self) -> u16 {
        self.volume
    }

    pub fn playmode(&self) -> PlayMode {
        self.playmode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

fn to_array<T: Copy, const N: usize>(name: &str, values: &[T]) -> Result<[T; N], ConfigError> {
    values.try_into().map_err(|_| {
        ConfigError::Invalid(format!(
            "{} must have exactly {} entries, found {}",
            name,
            N,
            values.len()
        ))
    })
}
