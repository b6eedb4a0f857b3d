use esteira::core::status::{
    normalize_status, resolve_status, status_label, Status, ALL_STATUSES,
};
use esteira::core::types::Tone;

#[test]
fn every_legacy_alias_maps_to_a_canonical_status() {
    let cases = [
        ("PENDENTE", "PRONTA_DIGITAR"),
        ("ENVIADA_ESTEIRA", "PRONTA_DIGITAR"),
        ("FORMALIZADA", "ANALISE_BANCO"),
        ("EM_ANALISE_BANCO", "ANALISE_BANCO"),
        ("PENDENTE_BANCO", "PENDENCIA"),
        ("EM_TRATATIVA_VENDEDOR", "DEVOLVIDA_VENDEDOR"),
        ("REENVIADA_BANCO", "ANALISE_BANCO"),
        ("EM_ANALISE", "ANALISE_BANCO"),
        ("DEVOLVIDA", "DEVOLVIDA_VENDEDOR"),
    ];
    for (legacy, canonical) in cases {
        assert_eq!(normalize_status(legacy), canonical, "alias {}", legacy);
        assert!(resolve_status(legacy).is_some(), "alias {}", legacy);
    }
}

#[test]
fn canonical_statuses_are_fixed_points() {
    for status in ALL_STATUSES {
        assert_eq!(normalize_status(status.as_str()), status.as_str());
        assert_eq!(resolve_status(status.as_str()), Some(status));
    }
}

#[test]
fn normalization_is_idempotent_over_arbitrary_input() {
    for raw in [
        "pendente",
        "  Formalizada  ",
        "APROVADO",
        "RASCUNHO_ANTIGO",
        "",
        "em analise",
    ] {
        let once = normalize_status(raw);
        assert_eq!(normalize_status(&once), once, "input {:?}", raw);
    }
}

#[test]
fn unknown_statuses_pass_through_uppercased() {
    assert_eq!(normalize_status(" rascunho "), "RASCUNHO");
    assert_eq!(resolve_status("RASCUNHO"), None);
}

#[test]
fn labels_cover_legacy_and_unknown_input() {
    assert_eq!(status_label("PENDENTE"), "Pronta para digitar");
    assert_eq!(status_label("em_tratativa_vendedor"), "Devolvida para vendedor");
    assert_eq!(status_label("STATUS_NOVO"), "STATUS NOVO");
    assert_eq!(status_label(""), "-");
    assert_eq!(status_label("   "), "-");
}

#[test]
fn terminal_flags_and_tones() {
    assert!(Status::Aprovado.is_terminal());
    assert!(Status::Reprovado.is_terminal());
    for status in ALL_STATUSES {
        if !matches!(status, Status::Aprovado | Status::Reprovado) {
            assert!(!status.is_terminal(), "{} should not be terminal", status);
        }
    }
    assert_eq!(Status::Aprovado.tone(), Tone::Green);
    assert_eq!(Status::Reprovado.tone(), Tone::Red);
    assert_eq!(Status::DevolvidaVendedor.tone(), Tone::Blue);
    assert_eq!(Status::EmDigitacao.tone(), Tone::Yellow);
}
