/// Named numeric property of a scene object that an animation chain can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Binding {
    U,
    V,
    X,
    Y,
    Z,
    Width,
    Height,
    R,
    G,
    B,
    Alpha,
    /// Secondary opacity
    Alpha2,
    Size,
    Rotation,
    RotX,
    RotY,
    RotZ,
    /// Secondary rectangle, e.g. a sprite's source region
    X2,
    Y2,
    Width2,
    Height2,
    /// Group origin, added to the animated `X`/`Y` offset
    BaseX,
    BaseY,
}

/// Lookup from binding names to the `f64` fields of a concrete type.
///
/// Usually derived with `#[derive(Bindable)]` and `#[bind(..)]` field attributes.
pub trait Bindable {
    /// The field driven by `binding`, or `None` if this type has no such property.
    fn binding_mut(&mut self, binding: Binding) -> Option<&mut f64>;

    /// Current value of the field driven by `binding`.
    fn binding(&self, binding: Binding) -> Option<f64>;

    fn supports(&self, binding: Binding) -> bool {
        self.binding(binding).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bindable;

    #[derive(Bindable)]
    struct Point {
        #[bind(X)]
        x: f64,
        #[bind(Y)]
        y: f64,
        #[allow(dead_code)]
        label: &'static str,
    }

    #[derive(Bindable)]
    struct Marker {
        #[bind(flatten)]
        origin: Point,
        #[bind(Alpha, Alpha2)]
        alpha: f64,
    }

    #[test]
    fn test_derived_lookup() {
        let mut point = Point {
            x: 1.0,
            y: 2.0,
            label: "p",
        };
        assert_eq!(point.binding(Binding::X), Some(1.0));
        assert_eq!(point.binding(Binding::Width), None);

        if let Some(y) = point.binding_mut(Binding::Y) {
            *y = 7.5;
        }
        assert_eq!(point.y, 7.5);
        assert!(point.supports(Binding::X));
        assert!(!point.supports(Binding::Rotation));
    }

    #[test]
    fn test_flatten_and_aliases() {
        let mut marker = Marker {
            origin: Point {
                x: 3.0,
                y: 4.0,
                label: "m",
            },
            alpha: 0.5,
        };

        assert_eq!(marker.binding(Binding::X), Some(3.0));
        assert_eq!(marker.binding(Binding::Alpha2), Some(0.5));

        if let Some(x) = marker.binding_mut(Binding::X) {
            *x = 10.0;
        }
        assert_eq!(marker.origin.x, 10.0);
        assert_eq!(marker.binding(Binding::BaseX), None);
    }
}
