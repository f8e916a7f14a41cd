//! services/markdown.rs
//! Convierte el Markdown del admin al subconjunto de HTML que acepta
//! Telegram (<b>, <i>, <u>, <s>, <a>, <code>, <pre>). Todo lo demás se
//! degrada a texto plano con saltos de línea explícitos.
//!
//! Se parsea a un árbol (`markdown::tokenize`) y se emite caminando los
//! nodos; solo salen tags de la whitelist, nunca markup arbitrario que
//! Telegram pueda rechazar.

use anyhow::{anyhow, Result};
use markdown::{Block, ListItem, Span};

/// Convierte Markdown a HTML de Telegram.
///
/// Las listas ordenadas pierden su numeración y salen con viñeta, igual
/// que las no ordenadas. Limitación conocida, no corregida a propósito.
pub fn to_telegram_html(source: &str) -> Result<String> {
    let mut out = String::with_capacity(source.len());

    for block in markdown::tokenize(source) {
        push_block(&mut out, block);
    }

    let out = collapse_newlines(&out).trim().to_string();

    // Entrada no vacía que quedó en nada (p.e. solo imágenes): el caller
    // debe mandar el texto original en vez de un mensaje vacío.
    if out.is_empty() && !source.trim().is_empty() {
        return Err(anyhow!("conversion produced empty text"));
    }

    Ok(out)
}

fn push_block(out: &mut String, block: Block) {
    match block {
        Block::Header(spans, _) => {
            out.push_str("<b>");
            spans.into_iter().for_each(|s| push_span(out, s));
            out.push_str("</b>\n");
        }
        Block::Paragraph(spans) => {
            spans.into_iter().for_each(|s| push_span(out, s));
            out.push('\n');
        }
        // El contenedor de cita no existe en Telegram: se emiten sus
        // bloques internos tal cual.
        Block::Blockquote(blocks) => blocks.into_iter().for_each(|b| push_block(out, b)),
        Block::CodeBlock(_, code) => {
            out.push_str("<pre>");
            push_escaped(out, &code);
            out.push_str("</pre>\n");
        }
        Block::OrderedList(items, _) => items.into_iter().for_each(|i| push_listitem(out, i)),
        Block::UnorderedList(items) => items.into_iter().for_each(|i| push_listitem(out, i)),
        Block::Raw(text) => {
            push_escaped(out, &text);
            out.push('\n');
        }
        Block::Hr => (),
    }
}

fn push_listitem(out: &mut String, item: ListItem) {
    out.push_str("\u{2022} ");
    match item {
        ListItem::Simple(spans) => {
            spans.into_iter().for_each(|s| push_span(out, s));
            out.push('\n');
        }
        ListItem::Paragraph(blocks) => blocks.into_iter().for_each(|b| push_block(out, b)),
    }
}

fn push_span(out: &mut String, span: Span) {
    match span {
        Span::Break => out.push('\n'),
        Span::Text(text) => push_escaped(out, &text),
        Span::Code(code) => {
            out.push_str("<code>");
            push_escaped(out, &code);
            out.push_str("</code>");
        }
        Span::Link(text, url, _) => {
            out.push_str("<a href=\"");
            push_escaped(out, &url);
            out.push_str("\">");
            push_escaped(out, &text);
            out.push_str("</a>");
        }
        // Telegram no muestra imágenes inline: queda el texto alternativo.
        Span::Image(alt, _, _) => push_escaped(out, &alt),
        Span::Emphasis(spans) => {
            out.push_str("<i>");
            spans.into_iter().for_each(|s| push_span(out, s));
            out.push_str("</i>");
        }
        Span::Strong(spans) => {
            out.push_str("<b>");
            spans.into_iter().for_each(|s| push_span(out, s));
            out.push_str("</b>");
        }
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// 3+ saltos seguidos se reducen a exactamente 2.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run <= 2 {
                out.push(c);
            }
        } else {
            run = 0;
            out.push(c);
        }
    }
    out
}
