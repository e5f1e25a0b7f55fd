use super::Platform;

/// Logical cursor shapes requested by the GUI library.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum CursorShape {
    #[default]
    Arrow,
    TextInput,
    ResizeAll,
    ResizeNS,
    ResizeEW,
    ResizeNESW,
    ResizeNWSE,
    Hand,
    NotAllowed,
}

impl CursorShape {
    pub const ALL: [CursorShape; 9] = [
        CursorShape::Arrow,
        CursorShape::TextInput,
        CursorShape::ResizeAll,
        CursorShape::ResizeNS,
        CursorShape::ResizeEW,
        CursorShape::ResizeNESW,
        CursorShape::ResizeNWSE,
        CursorShape::Hand,
        CursorShape::NotAllowed,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Collapses egui's cursor vocabulary onto the shapes a platform provides.
    ///
    /// `None` means the GUI asked for no cursor at all.
    pub fn from_egui(icon: egui::CursorIcon) -> Option<Self> {
        use egui::CursorIcon as I;
        let shape = match icon {
            I::None => return None,
            I::Text | I::VerticalText => CursorShape::TextInput,
            I::Move | I::AllScroll | I::Grab | I::Grabbing => CursorShape::ResizeAll,
            I::ResizeVertical | I::ResizeNorth | I::ResizeSouth | I::ResizeRow => {
                CursorShape::ResizeNS
            }
            I::ResizeHorizontal | I::ResizeEast | I::ResizeWest | I::ResizeColumn => {
                CursorShape::ResizeEW
            }
            I::ResizeNeSw | I::ResizeNorthEast | I::ResizeSouthWest => CursorShape::ResizeNESW,
            I::ResizeNwSe | I::ResizeNorthWest | I::ResizeSouthEast => CursorShape::ResizeNWSE,
            I::PointingHand => CursorShape::Hand,
            I::NotAllowed | I::NoDrop => CursorShape::NotAllowed,
            _ => CursorShape::Arrow,
        };
        Some(shape)
    }
}

/// Platform cursor handles for every logical shape.
///
/// Built once at startup and read-only afterwards; handles are released when
/// the registry is dropped.
#[derive(Debug)]
pub struct CursorRegistry<C> {
    cursors: Vec<C>,
}

impl<C> CursorRegistry<C> {
    pub fn new<P>(platform: &mut P) -> Self
    where
        P: Platform<Cursor = C> + ?Sized,
    {
        let cursors = CursorShape::ALL
            .iter()
            .map(|shape| platform.create_cursor(*shape))
            .collect();
        Self { cursors }
    }

    pub fn get(&self, shape: CursorShape) -> &C {
        &self.cursors[shape.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::scripted::ScriptedPlatform;

    #[test]
    fn registry_holds_one_handle_per_shape() {
        let mut p = ScriptedPlatform::new();
        let reg = CursorRegistry::new(&mut p);
        for shape in CursorShape::ALL {
            assert_eq!(*reg.get(shape), shape);
        }
        assert_eq!(p.cursors_created, CursorShape::ALL.len());
    }

    #[test]
    fn egui_icons_collapse_to_platform_shapes() {
        assert_eq!(CursorShape::from_egui(egui::CursorIcon::Default), Some(CursorShape::Arrow));
        assert_eq!(CursorShape::from_egui(egui::CursorIcon::Text), Some(CursorShape::TextInput));
        assert_eq!(CursorShape::from_egui(egui::CursorIcon::PointingHand), Some(CursorShape::Hand));
        assert_eq!(
            CursorShape::from_egui(egui::CursorIcon::ResizeHorizontal),
            Some(CursorShape::ResizeEW)
        );
        assert_eq!(CursorShape::from_egui(egui::CursorIcon::None), None);
    }

    #[test]
    fn all_is_index_ordered() {
        for (i, shape) in CursorShape::ALL.iter().enumerate() {
            assert_eq!(shape.index(), i);
        }
    }
}
