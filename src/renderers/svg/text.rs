//! Text element output.
//!
//! Lines become tspan children positioned one row apart; alignment and
//! the box extents ride along so import restores the editor text box.

use crate::models::{HAlign, TextShape, VAlign};

use super::defs::SvgBuildState;
use super::elements::rotate_transform;
use super::style::{format_float, to_style, to_svg_color};
use super::tree::SvgElement;

pub(crate) fn build_text(shape: &TextShape, state: &mut SvgBuildState) -> SvgElement {
    let angle = shape.tri.angle();
    let axis = shape.tri.rotated(-angle, shape.tri.p0());
    let p0 = axis.p0();
    let w = axis.width();
    let h = axis.height();
    // The y attribute points at the first baseline, one row below the
    // box top.
    let row_height = shape.row_height();

    let mut element = SvgElement::new("text");
    element.set("faint:bounded", if shape.bounded { "1" } else { "0" });

    let mut x0 = p0.x;
    match shape.halign {
        HAlign::Center => {
            element.set("text-anchor", "middle");
            x0 += w / 2.0;
        }
        HAlign::Right => {
            element.set("text-anchor", "end");
            x0 += w;
        }
        HAlign::Left => {}
    }
    match shape.valign {
        VAlign::Middle => element.set("faint:valign", "middle"),
        VAlign::Bottom => element.set("faint:valign", "bottom"),
        VAlign::Top => {}
    }

    element.set("x", format_float(x0));
    element.set("y", format_float(p0.y + row_height));
    element.set("width", format_float(w));
    element.set("height", format_float(h));
    element.set(
        "style",
        to_style(vec![
            ("fill", to_svg_color(&shape.style.fg, state)),
            ("font-size", format!("{}px", format_float(shape.font.size))),
            ("font-family", shape.font.family.clone()),
            (
                "font-style",
                if shape.font.italic { "italic" } else { "normal" }.to_string(),
            ),
            (
                "font-weight",
                if shape.font.bold { "bold" } else { "normal" }.to_string(),
            ),
        ]),
    );
    if shape.parsing {
        element.set("faint:parsing", "1");
    }
    if angle != 0.0 {
        element.set("transform", rotate_transform(angle, shape.tri.p0()));
    }

    let lines = shape.lines();
    let mut line_tri = axis;
    match shape.valign {
        VAlign::Middle => {
            line_tri = line_tri.offset_aligned(0.0, (h - row_height * lines.len() as f64) / 2.0);
        }
        VAlign::Bottom => {
            line_tri = line_tri.offset_aligned(0.0, h - row_height * lines.len() as f64);
        }
        VAlign::Top => {}
    }
    for (index, &line) in lines.iter().enumerate() {
        let lp = line_tri.p0();
        let mut lx = lp.x;
        match shape.halign {
            HAlign::Center => lx += (w - shape.line_width(line)) / 2.0,
            HAlign::Right => lx += w - shape.line_width(line),
            HAlign::Left => {}
        }
        let mut tspan = SvgElement::new("tspan");
        tspan.set("x", format_float(lx));
        tspan.set("y", format_float(lp.y + row_height));
        if index + 1 < lines.len() {
            tspan.set("faint:hardbreak", "1");
        }
        tspan.set_text(line);
        element.append(tspan);
        line_tri = line_tri.offset_aligned(0.0, row_height);
    }

    if shape.parsing {
        let mut raw = SvgElement::new("faint:raw");
        raw.set_text(shape.text.clone());
        element.append(raw);
    }
    element
}
