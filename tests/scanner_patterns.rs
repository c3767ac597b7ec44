use ngx_translate_assist::catalog::{locate_key, parse_catalog};
use ngx_translate_assist::config::LocateStrategy;
use ngx_translate_assist::key_path::Catalog;
use ngx_translate_assist::scanner::suppressed_regions;
use ngx_translate_assist::{find_candidate_spans, Dialect, DottedKey};
use std::path::Path;

fn texts(content: &str, dialect: Dialect) -> Vec<String> {
    find_candidate_spans(content, dialect)
        .into_iter()
        .map(|span| span.text)
        .collect()
}

fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

#[test]
fn pattern_text_node() {
    let spans = find_candidate_spans("<p>Hello World</p>", Dialect::Markup);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "Hello World");
    assert!(spans[0].start < spans[0].end);
}

#[test]
fn pattern_interpolation_with_translate_filter() {
    assert!(texts("{{ 'home.title' | translate }}", Dialect::Markup).is_empty());
}

#[test]
fn pattern_translate_instant_call() {
    assert!(texts("this.translate.instant('home.title')", Dialect::Script).is_empty());
}

#[test]
fn pattern_const_declaration() {
    assert!(texts(r#"const x = "Save""#, Dialect::Script).is_empty());
}

#[test]
fn pattern_span_offsets_slice_the_document() {
    let content = r#"<section>
  <h2>Übersicht 📊</h2>
  <input placeholder="Suche…" />
  <p translate="home.intro">Intro</p>
</section>"#;
    let units = utf16(content);
    let spans = find_candidate_spans(content, Dialect::Markup);

    assert_eq!(spans.len(), 2);
    for span in &spans {
        let sliced = String::from_utf16(&units[span.start..span.end]).unwrap();
        assert_eq!(sliced, span.text);
    }
}

#[test]
fn pattern_no_candidate_overlaps_a_suppressed_region() {
    let content = r#"<div>
  <h1>{{ 'home.title' | translate }}</h1>
  <p translate>home.intro</p>
  <img [alt]="'home.logo' | translate" alt="Logo">
  <span title="Plain title">Plain text</span>
</div>"#;
    let suppressed = suppressed_regions(content, Dialect::Markup);
    assert!(!suppressed.is_empty());

    let spans = find_candidate_spans(content, Dialect::Markup);
    assert_eq!(
        spans.iter().map(|s| s.text.as_str()).collect::<Vec<_>>(),
        vec!["Plain title", "Plain text"]
    );
    // Content is ASCII, so UTF-16 offsets equal byte offsets
    for span in &spans {
        assert!(!suppressed.overlaps(span.start, span.end));
    }
}

#[test]
fn pattern_component_source() {
    let content = r#"import { Component } from '@angular/core';
import { TranslateService } from '@ngx-translate/core';

@Component({
  selector: 'app-home',
  templateUrl: './home.component.html',
})
export class HomeComponent {
  private readonly apiPath = 'api/users';
  title = 'Dashboard';

  constructor(private translate: TranslateService) {}

  save() {
    // 'Comment text' is not user facing
    alert(this.translate.instant('home.saved'));
    this.notify("Profile updated");
    this.notify(this.translate.instant("Already localized"));
  }
}
"#;
    assert_eq!(
        texts(content, Dialect::Script),
        vec!["app-home", "Dashboard", "Profile updated"]
    );
}

#[test]
fn pattern_spans_are_ordered() {
    let content = r#"<p title="First">Second</p><p>Third</p>"#;
    let spans = find_candidate_spans(content, Dialect::Markup);
    assert!(spans.windows(2).all(|w| w[0].end <= w[1].start));
    assert_eq!(spans.len(), 3);
}

#[test]
fn pattern_written_keys_are_locatable() {
    let mut catalog = Catalog::new();
    let keys = ["a.b.c", "a.b.d", "home.title", "about.title", "footer"];
    for key in keys {
        catalog.set(&DottedKey::parse(key).unwrap(), "v");
    }
    let content = catalog.to_pretty_json();

    let reparsed = parse_catalog(&content, Path::new("en.json")).unwrap();
    assert_eq!(reparsed.keys(), keys);

    for key in keys {
        let key = DottedKey::parse(key).unwrap();
        assert!(
            locate_key(&content, &key, LocateStrategy::Scoped).is_some(),
            "{} not found",
            key
        );
    }
}
