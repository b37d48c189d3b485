/// Render an aligned plain-text table. Cells wider than `max_width` allows
/// are truncated with `…`, widest column first.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], max_width: Option<usize>) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    if let Some(max_width) = max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = render_row(headers.iter().copied(), &widths);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let cells = (0..headers.len()).map(|index| row.get(index).map_or("-", String::as_str));
        lines.push(render_row(cells, &widths));
    }
    lines.join("\n")
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| pad(&truncate(cell, *width), *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * 2;
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].len().max(6))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            break;
        };
        widths[index] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{value}{}", " ".repeat(width.saturating_sub(len)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::render_table;

    #[test]
    fn columns_align_across_rows() {
        let rows = vec![
            vec!["alice".to_string(), "Security".to_string()],
            vec!["jdoe".to_string(), "Platform, Security".to_string()],
        ];
        let table = render_table(&["username", "teams"], &rows, None);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "username  teams");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "alice     Security");
        assert_eq!(lines[3], "jdoe      Platform, Security");
    }

    #[test]
    fn wide_cells_are_truncated_to_fit() {
        let rows = vec![vec!["u1".to_string(), "x".repeat(80)]];
        let table = render_table(&["uuid", "permissions"], &rows, Some(40));

        assert!(table.lines().all(|line| line.chars().count() <= 40));
        assert!(table.contains('…'));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let rows = vec![vec!["only".to_string()]];
        let table = render_table(&["a", "b"], &rows, None);
        assert!(table.lines().nth(2).is_some_and(|line| line.ends_with('-')));
    }
}
