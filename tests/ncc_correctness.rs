use imagewithin::lowlevel::{correlate, extract_matches, Kernel, NccScalar, TemplatePlan};
use imagewithin::{ImageView, ImageWithinError, OwnedImage, Template};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> Vec<u8> {
    let mut data = vec![0u8; width * height];
    for value in data.iter_mut() {
        *value = rng.random_range(0..=255);
    }
    data
}

fn crop(
    data: &[u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
) -> Template {
    let view = ImageView::from_slice(data, width, height).unwrap();
    Template::from_image(OwnedImage::from_view(view.roi(x, y, w, h).unwrap()).unwrap())
}

#[test]
fn cropped_template_scores_one_at_true_origin() {
    let mut rng = StdRng::seed_from_u64(123);
    let (width, height) = (64, 48);
    let image = random_image(&mut rng, width, height);
    let template = crop(&image, width, height, 21, 17, 13, 9);

    let view = ImageView::from_slice(&image, width, height).unwrap();
    let surface = correlate(view, &template).unwrap();

    assert_eq!(surface.width(), width - 13 + 1);
    assert_eq!(surface.height(), height - 9 + 1);
    let score = surface.get(21, 17).unwrap();
    assert!((score - 1.0).abs() < 1e-5, "score {score}");
    let (bx, by, _) = surface.best();
    assert_eq!((bx, by), (21, 17));
}

#[test]
fn surface_values_stay_within_unit_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for trial in 0..6 {
        let width = rng.random_range(12..40);
        let height = rng.random_range(12..40);
        let tpl_w = rng.random_range(1..=width.min(10));
        let tpl_h = rng.random_range(1..=height.min(10));
        let image = random_image(&mut rng, width, height);
        // Alternate between noise templates and crops of the image.
        let template = if trial % 2 == 0 {
            Template::new(random_image(&mut rng, tpl_w, tpl_h), tpl_w, tpl_h).unwrap()
        } else {
            crop(&image, width, height, 0, 0, tpl_w, tpl_h)
        };

        let view = ImageView::from_slice(&image, width, height).unwrap();
        let surface = correlate(view, &template).unwrap();
        for &score in surface.as_slice() {
            assert!(
                (-1.0..=1.0).contains(&score),
                "trial {trial}: score {score} out of range"
            );
        }
    }
}

#[test]
fn score_at_agrees_with_dense_surface() {
    let mut rng = StdRng::seed_from_u64(99);
    let image = random_image(&mut rng, 30, 20);
    let tpl = random_image(&mut rng, 6, 5);
    let view = ImageView::from_slice(&image, 30, 20).unwrap();
    let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 6, 5).unwrap()).unwrap();

    let surface = <NccScalar as Kernel>::correlate(view, &plan).unwrap();
    for (x, y) in [(0, 0), (24, 15), (11, 7), (3, 12)] {
        let single = <NccScalar as Kernel>::score_at(view, &plan, x, y).unwrap();
        assert_eq!(Some(single), surface.get(x, y));
    }
    assert!(<NccScalar as Kernel>::score_at(view, &plan, 25, 0).is_none());
}

#[test]
fn score_ignores_uniform_gain_and_offset() {
    let mut rng = StdRng::seed_from_u64(5);
    let (width, height) = (40, 30);
    let image = random_image(&mut rng, width, height);
    let template = crop(&image, width, height, 8, 11, 10, 10);

    let dimmed: Vec<u8> = image.iter().map(|&v| v / 4 + 30).collect();
    let view = ImageView::from_slice(&dimmed, width, height).unwrap();
    let surface = correlate(view, &template).unwrap();
    let score = surface.get(8, 11).unwrap();
    assert!(score > 0.99, "score {score}");
    assert_eq!(surface.best().0, 8);
}

#[test]
fn matches_are_sorted_left_to_right() {
    let mut rng = StdRng::seed_from_u64(31);
    let (width, height) = (60, 40);
    let tpl = random_image(&mut rng, 8, 8);
    let mut image = vec![128u8; width * height];
    let origins = [(45usize, 3usize), (4, 30), (22, 12), (22, 2)];
    for &(ox, oy) in &origins {
        for ty in 0..8 {
            for tx in 0..8 {
                image[(oy + ty) * width + ox + tx] = tpl[ty * 8 + tx];
            }
        }
    }

    let view = ImageView::from_slice(&image, width, height).unwrap();
    let template = Template::new(tpl, 8, 8).unwrap();
    let surface = correlate(view, &template).unwrap();
    let set = extract_matches(&surface, 0.9);

    let got: Vec<_> = set.iter().map(|m| (m.x, m.y)).collect();
    assert_eq!(got, vec![(4, 30), (22, 2), (22, 12), (45, 3)]);
    for pair in set.as_slice().windows(2) {
        assert!(pair[0].x <= pair[1].x);
    }
}

#[test]
fn oversized_template_signals_scale_incompatible() {
    let image = vec![0u8; 10 * 10];
    let view = ImageView::from_slice(&image, 10, 10).unwrap();
    let template = Template::new(vec![1u8; 11 * 3], 11, 3).unwrap();
    assert!(matches!(
        correlate(view, &template),
        Err(ImageWithinError::ScaleIncompatible { .. })
    ));
}
