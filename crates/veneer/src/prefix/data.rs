//! Static vendor-prefix database.
//!
//! Maps a camelCase property name to the vendor prefixes under which the
//! property must additionally be emitted. Derived from browser support
//! data; treated as opaque policy by the rest of the engine.

use phf::phf_map;

/// A vendor prefix, in both its camelCase property form and its dashed
/// value form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Webkit,
    Moz,
    Ms,
}

impl Prefix {
    /// The camelCase property-name form, e.g. `Webkit` in
    /// `WebkitTransform`.
    pub fn as_camel(self) -> &'static str {
        match self {
            Prefix::Webkit => "Webkit",
            Prefix::Moz => "Moz",
            Prefix::Ms => "ms",
        }
    }

    /// The dashed value form, e.g. `-webkit-`.
    pub fn as_dashed(self) -> &'static str {
        match self {
            Prefix::Webkit => "-webkit-",
            Prefix::Moz => "-moz-",
            Prefix::Ms => "-ms-",
        }
    }
}

const W: &[Prefix] = &[Prefix::Webkit];
const M: &[Prefix] = &[Prefix::Moz];
const MS: &[Prefix] = &[Prefix::Ms];
const WM: &[Prefix] = &[Prefix::Webkit, Prefix::Moz];
const WMS: &[Prefix] = &[Prefix::Webkit, Prefix::Ms];
const WMMS: &[Prefix] = &[Prefix::Webkit, Prefix::Moz, Prefix::Ms];
const MSW: &[Prefix] = &[Prefix::Ms, Prefix::Webkit];

/// Property name to required vendor prefixes.
pub static PREFIX_MAP: phf::Map<&'static str, &'static [Prefix]> = phf_map! {
    "transform" => WMS,
    "transformOrigin" => WMS,
    "transformOriginX" => WMS,
    "transformOriginY" => WMS,
    "backfaceVisibility" => W,
    "perspective" => W,
    "perspectiveOrigin" => W,
    "transformStyle" => W,
    "transformOriginZ" => W,
    "animation" => W,
    "animationDelay" => W,
    "animationDirection" => W,
    "animationFillMode" => W,
    "animationDuration" => W,
    "animationIterationCount" => W,
    "animationName" => W,
    "animationPlayState" => W,
    "animationTimingFunction" => W,
    "appearance" => WM,
    "userSelect" => WMMS,
    "fontKerning" => W,
    "textEmphasisPosition" => W,
    "textEmphasis" => W,
    "textEmphasisStyle" => W,
    "textEmphasisColor" => W,
    "boxDecorationBreak" => W,
    "clipPath" => W,
    "maskImage" => W,
    "maskMode" => W,
    "maskRepeat" => W,
    "maskPosition" => W,
    "maskClip" => W,
    "maskOrigin" => W,
    "maskSize" => W,
    "maskComposite" => W,
    "mask" => W,
    "maskBorderSource" => W,
    "maskBorderMode" => W,
    "maskBorderSlice" => W,
    "maskBorderWidth" => W,
    "maskBorderOutset" => W,
    "maskBorderRepeat" => W,
    "maskBorder" => W,
    "maskType" => W,
    "textDecorationStyle" => WM,
    "textDecorationSkip" => WM,
    "textDecorationLine" => WM,
    "textDecorationColor" => WM,
    "filter" => W,
    "fontFeatureSettings" => WM,
    "breakAfter" => WMMS,
    "breakBefore" => WMMS,
    "breakInside" => WMMS,
    "columnCount" => WM,
    "columnFill" => WM,
    "columnGap" => WM,
    "columnRule" => WM,
    "columnRuleColor" => WM,
    "columnRuleStyle" => WM,
    "columnRuleWidth" => WM,
    "columns" => WM,
    "columnSpan" => WM,
    "columnWidth" => WM,
    "writingMode" => WMS,
    "flex" => WMS,
    "flexBasis" => W,
    "flexDirection" => WMS,
    "flexGrow" => W,
    "flexFlow" => WMS,
    "flexShrink" => W,
    "flexWrap" => WMS,
    "alignContent" => W,
    "alignItems" => W,
    "alignSelf" => W,
    "justifyContent" => W,
    "order" => W,
    "transitionDelay" => W,
    "transitionDuration" => W,
    "transitionProperty" => W,
    "transitionTimingFunction" => W,
    "backdropFilter" => W,
    "scrollSnapType" => WMS,
    "scrollSnapPointsX" => WMS,
    "scrollSnapPointsY" => WMS,
    "scrollSnapDestination" => WMS,
    "scrollSnapCoordinate" => WMS,
    "shapeImageThreshold" => W,
    "shapeImageMargin" => W,
    "shapeImageOutside" => W,
    "hyphens" => WMMS,
    "flowInto" => WMS,
    "flowFrom" => WMS,
    "regionFragment" => WMS,
    "textOrientation" => W,
    "boxSizing" => M,
    "textAlignLast" => M,
    "tabSize" => M,
    "wrapFlow" => MS,
    "wrapThrough" => MS,
    "wrapMargin" => MS,
    "touchAction" => MS,
    "gridTemplateColumns" => MS,
    "gridTemplateRows" => MS,
    "gridTemplateAreas" => MS,
    "gridTemplate" => MS,
    "gridAutoColumns" => MS,
    "gridAutoRows" => MS,
    "gridAutoFlow" => MS,
    "grid" => MS,
    "gridRowStart" => MS,
    "gridColumnStart" => MS,
    "gridRowEnd" => MS,
    "gridRow" => MS,
    "gridColumn" => MS,
    "gridColumnEnd" => MS,
    "gridColumnGap" => MS,
    "gridRowGap" => MS,
    "gridArea" => MS,
    "gridGap" => MS,
    "textSizeAdjust" => MSW,
    "borderImage" => W,
    "borderImageOutset" => W,
    "borderImageRepeat" => W,
    "borderImageSlice" => W,
    "borderImageSource" => W,
    "borderImageWidth" => W,
};
