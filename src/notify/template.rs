// src/notify/template.rs

//! HTML rendering for the notification email.
//!
//! Keeps the fixed visual structure of the original report: title heading,
//! ementa, separators, histórico, informações complementares, and a
//! trailing timestamp line linking back to the source URL.

use crate::models::ProposalSnapshot;

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape and turn newlines into `<br>`.
fn as_html_block(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// Render the success email body for a snapshot.
pub fn render(snapshot: &ProposalSnapshot) -> String {
    let consulted_at = snapshot.fetched_at.format("%d/%m/%Y %H:%M:%S");

    format!(
        r#"<div style="font-family:Arial; color:#333;">
    <h2 style="color:#004b87;">{titulo}</h2>
    <p><strong>Ementa:</strong><br>{ementa}</p>
    <hr>
    <h3 style="color:#004b87;">Histórico</h3>
    <p>{historico}</p>
    <hr>
    <h3 style="color:#004b87;">Informações Complementares</h3>
    <p>{info}</p>
    <hr>
    <p>
        <small>Consulta realizada em {consulted_at} |
        <a href="{url}" target="_blank">Acessar Proposição</a></small>
    </p>
</div>"#,
        titulo = escape_html(&snapshot.titulo),
        ementa = as_html_block(&snapshot.ementa),
        historico = as_html_block(&snapshot.historico),
        info = as_html_block(&snapshot.info_complementar),
        consulted_at = consulted_at,
        url = escape_html(&snapshot.url),
    )
}

/// Render the body for a failed run.
pub fn render_error(message: &str) -> String {
    format!(
        r#"<div style="font-family:Arial; color:#333;">
    <h2 style="color:#a33;">Erro na execução</h2>
    <p>{}</p>
</div>"#,
        escape_html(message)
    )
}
