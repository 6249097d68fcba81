use std::panic;

const TAX_ID_PUNCTUATION: [char; 3] = ['.', '-', '/'];

/// Masks CPF (11 digits) and CNPJ (14 digits) numbers, punctuated or not,
/// keeping only the check digits.
pub fn mask_tax_id(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut run = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() || (!run.is_empty() && TAX_ID_PUNCTUATION.contains(&ch)) {
            run.push(ch);
        } else {
            flush_run(&mut run, &mut output);
            output.push(ch);
        }
    }
    flush_run(&mut run, &mut output);

    output
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = mask_tax_id(&payload);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "credibot panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            );
        } else {
            eprintln!("credibot panic: {}", scrubbed);
        }
    }));
}

fn flush_run(run: &mut String, output: &mut String) {
    if run.is_empty() {
        return;
    }

    let id_len = run.trim_end_matches(|ch: char| !ch.is_ascii_digit()).len();
    let (candidate, tail) = run.split_at(id_len);
    let digits: String = candidate.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        11 => output.push_str(&format!("***.***.***-{}", &digits[9..])),
        14 => output.push_str(&format!("**.***.***/****-{}", &digits[12..])),
        _ => output.push_str(candidate),
    }
    output.push_str(tail);
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_punctuated_and_bare_cpf() {
        assert_eq!(
            mask_tax_id("cliente 123.456.789-09 falhou"),
            "cliente ***.***.***-09 falhou"
        );
        assert_eq!(mask_tax_id("cpf=12345678909"), "cpf=***.***.***-09");
    }

    #[test]
    fn masks_cnpj() {
        assert_eq!(
            mask_tax_id("empresa 12.345.678/0001-90."),
            "empresa **.***.***/****-90."
        );
    }

    #[test]
    fn leaves_other_numbers_alone() {
        let input = "page 2 of 40, score 780, 2024-05-01";

        assert_eq!(mask_tax_id(input), input);
    }
}
