//! Highlight splicing, inline markdown, panel placement and summary metrics.

use biaslens_core::inline::{plain_text, tokenize, Run};
use biaslens_core::metrics::{percentage, IssueBreakdown};
use biaslens_core::panel::{place_panel, render_with_panel, RenderItem};
use biaslens_core::resolve::{locate_segment, RawSegment, ResolvedSegmentList};
use biaslens_core::splice::{render, BlockKind, Highlight, Node};
use biaslens_core::{CritiqueSegment, IssueType, Severity};

fn segment(answer: &str, index: usize, text: &str, severity: Severity) -> CritiqueSegment {
    locate_segment(
        answer,
        index,
        RawSegment {
            text: text.to_owned(),
            issue_type: IssueType::Assumption,
            severity,
            short_label: format!("label {index}"),
            detailed_analysis: format!("analysis {index}"),
        },
    )
}

fn highlighted(runs: Vec<Run>, id: &str, severity: Severity, ordinal: usize) -> Node {
    Node::Highlight(Highlight {
        segment_id: id.to_owned(),
        severity,
        selected: false,
        ordinal,
        runs,
    })
}

#[test]
fn highlight_is_spliced_between_markdown_runs() {
    let answer = "The sky is **blue** today.";
    let segs = vec![segment(answer, 0, "sky is", Severity::Low)];
    let blocks = render(answer, &ResolvedSegmentList::from_segments(&segs), None);

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Paragraph);
    assert_eq!(
        blocks[0].nodes,
        vec![
            Node::Text(vec![Run::Plain("The ".into())]),
            highlighted(vec![Run::Plain("sky is".into())], "segment-0", Severity::Low, 1),
            Node::Text(vec![
                Run::Plain(" ".into()),
                Run::Bold("blue".into()),
                Run::Plain(" today.".into()),
            ]),
        ]
    );
}

#[test]
fn only_the_intersecting_line_is_highlighted() {
    let answer = "Line one.\nLine two mentions X.";
    let segs = vec![segment(answer, 0, "mentions X", Severity::High)];
    let blocks = render(answer, &ResolvedSegmentList::from_segments(&segs), None);

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].highlights().count(), 0);
    let marks: Vec<&Highlight> = blocks[1].highlights().collect();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].severity, Severity::High);
    assert_eq!(plain_text(&marks[0].runs), "mentions X");
}

#[test]
fn multi_line_segment_is_highlighted_on_every_line_with_its_badge() {
    let answer = "Alpha beta\ngamma delta";
    let segs = vec![
        segment(answer, 0, "delta", Severity::Low),
        segment(answer, 1, "beta\ngamma", Severity::Medium),
    ];
    let resolved = ResolvedSegmentList::from_segments(&segs);
    let blocks = render(answer, &resolved, None);

    let first: Vec<_> = blocks[0].highlights().collect();
    let second: Vec<_> = blocks[1].highlights().collect();
    assert_eq!(first.len(), 1);
    assert_eq!(plain_text(&first[0].runs), "beta");
    assert_eq!(first[0].ordinal, 1);
    assert_eq!(second.len(), 2);
    assert_eq!(plain_text(&second[0].runs), "gamma");
    assert_eq!(second[0].ordinal, 1);
    assert_eq!(plain_text(&second[1].runs), "delta");
    assert_eq!(second[1].ordinal, 2);
}

#[test]
fn prefixes_and_indentation_are_stripped_before_splicing() {
    let answer = "  ## Title words\n- item one here";
    let segs = vec![
        segment(answer, 0, "Title", Severity::Low),
        segment(answer, 1, "one", Severity::Low),
    ];
    let blocks = render(answer, &ResolvedSegmentList::from_segments(&segs), None);

    assert_eq!(blocks[0].kind, BlockKind::Heading(2));
    assert_eq!(
        blocks[0].nodes,
        vec![
            highlighted(vec![Run::Plain("Title".into())], "segment-0", Severity::Low, 1),
            Node::Text(vec![Run::Plain(" words".into())]),
        ]
    );
    assert_eq!(blocks[1].kind, BlockKind::ListItem);
    assert_eq!(
        blocks[1].nodes,
        vec![
            Node::Text(vec![Run::Plain("item ".into())]),
            highlighted(vec![Run::Plain("one".into())], "segment-1", Severity::Low, 2),
            Node::Text(vec![Run::Plain(" here".into())]),
        ]
    );
}

#[test]
fn overlapping_segments_never_repeat_text() {
    let answer = "one two three four";
    let segs = vec![
        segment(answer, 0, "one two three", Severity::Low),
        segment(answer, 1, "two three four", Severity::High),
    ];
    let blocks = render(answer, &ResolvedSegmentList::from_segments(&segs), None);

    let visible: String = blocks[0]
        .nodes
        .iter()
        .map(|n| match n {
            Node::Text(runs) => plain_text(runs),
            Node::Highlight(h) => plain_text(&h.runs),
        })
        .collect();
    assert_eq!(visible, answer);
    let marks: Vec<_> = blocks[0].highlights().collect();
    assert_eq!(plain_text(&marks[1].runs), " four");
}

#[test]
fn delimiter_only_excerpt_is_not_highlighted() {
    let answer = "Use **care** here.";
    let segs = vec![segment(answer, 0, "**", Severity::High)];
    let resolved = ResolvedSegmentList::from_segments(&segs);
    assert_eq!(resolved.len(), 1);

    let blocks = render(answer, &resolved, None);
    assert_eq!(
        blocks[0].nodes,
        vec![Node::Text(vec![
            Run::Plain("Use ".into()),
            Run::Bold("care".into()),
            Run::Plain(" here.".into()),
        ])]
    );
}

#[test]
fn selected_segment_is_flagged() {
    let answer = "a b c";
    let segs = vec![segment(answer, 0, "b", Severity::Medium)];
    let blocks = render(answer, &ResolvedSegmentList::from_segments(&segs), Some("segment-0"));
    assert!(blocks[0].highlights().all(|h| h.selected));
}

#[test]
fn rendering_is_a_pure_function_of_its_inputs() {
    let answer = "# Head\n\nSome *text* with a quote.\n- bullet quote";
    let segs = vec![
        segment(answer, 0, "a quote", Severity::High),
        segment(answer, 1, "bullet", Severity::Low),
    ];
    let first = render_with_panel(
        answer,
        &ResolvedSegmentList::from_segments(&segs),
        Some("segment-1"),
    );
    let second = render_with_panel(
        answer,
        &ResolvedSegmentList::from_segments(&segs),
        Some("segment-1"),
    );
    assert_eq!(first, second);
}

#[test]
fn panel_follows_the_last_block_of_the_selected_segment() {
    let answer = "P1 mentions A.\nP2 here.\n\nP3 mentions B.";
    let segs = vec![
        segment(answer, 0, "mentions A", Severity::Low),
        segment(answer, 1, "here.\n\nP3", Severity::High),
    ];
    let resolved = ResolvedSegmentList::from_segments(&segs);

    let items = place_panel(render(answer, &resolved, None), &resolved, Some("segment-0"));
    assert_eq!(items.len(), 5);
    assert!(matches!(&items[1], RenderItem::Analysis(s) if s.id() == "segment-0"));

    let items = place_panel(render(answer, &resolved, None), &resolved, Some("segment-1"));
    assert!(matches!(&items[4], RenderItem::Analysis(s) if s.id() == "segment-1"));
}

#[test]
fn no_panel_without_a_known_selection() {
    let answer = "Only line.";
    let segs = vec![segment(answer, 0, "line", Severity::Low)];
    let resolved = ResolvedSegmentList::from_segments(&segs);

    for selected in [None, Some("segment-9")] {
        let items = place_panel(render(answer, &resolved, selected), &resolved, selected);
        assert!(items.iter().all(|i| matches!(i, RenderItem::Block(_))));
    }
}

#[test]
fn tokenize_drops_only_the_delimiters() {
    let text = "Plain **bold** and *it* with `code` and [link](http://x) end.";
    let runs = tokenize(text);
    assert_eq!(plain_text(&runs), "Plain bold and it with code and link end.");
    assert!(runs.contains(&Run::Link { label: "link".into(), url: "http://x".into() }));
    assert!(runs.contains(&Run::Code("code".into())));
}

#[test]
fn stray_specials_are_kept_literally() {
    let text = "2 * 3 and [x";
    assert_eq!(plain_text(&tokenize(text)), text);
}

#[test]
fn breakdown_counts_every_segment_including_unlocated() {
    let answer = "a b c";
    let mut segs = vec![
        segment(answer, 0, "a", Severity::High),
        segment(answer, 1, "zzz", Severity::High),
        segment(answer, 2, "c", Severity::Low),
    ];
    segs[2].issue_type = IssueType::Language;
    let breakdown = IssueBreakdown::from_segments(&segs);

    assert_eq!(breakdown.total, 3);
    assert_eq!(breakdown.located, 2);
    assert_eq!(breakdown.issue_count(IssueType::Assumption), 2);
    assert_eq!(breakdown.issue_count(IssueType::Language), 1);
    assert_eq!(breakdown.severity_count(Severity::High), 2);
    assert_eq!(breakdown.severity_count(Severity::Medium), 0);
    assert!((breakdown.percentage(2) - 66.666).abs() < 0.01);
    assert_eq!(
        breakdown.present_issues().collect::<Vec<_>>(),
        vec![(IssueType::Assumption, 2), (IssueType::Language, 1)]
    );
}

#[test]
fn empty_breakdown_never_divides_by_zero() {
    let breakdown = IssueBreakdown::from_segments(&[]);
    assert_eq!(breakdown.percentage(0), 0.0);
    assert_eq!(percentage(3, 0), 0.0);
}
